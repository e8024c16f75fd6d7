use minifb::{Key, Scale, Window, WindowOptions};

use chip8_vm::display::{HEIGHT, WIDTH};
use chip8_vm::Emulator;

const OFF_COLOR: u32 = 0x000000;
const ON_COLOR: u32 = 0x007FFF;

// 1 2 3 C        1 2 3 4
// 4 5 6 D   <-   Q W E R
// 7 8 9 E        A S D F
// A 0 B F        Z X C V
const KEYMAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

pub fn key_to_num(key: Key) -> Option<u8> {
    KEYMAP
        .iter()
        .find(|(mapped, _)| *mapped == key)
        .map(|&(_, num)| num)
}

/// Window that shows the framebuffer and feeds the keypad.
pub struct Frontend {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Frontend {
    pub fn new() -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "chip8-vm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: Scale::X16,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // the host loop paces redraws itself
        window.limit_update_rate(None);
        Ok(Self {
            pixel_buffer: vec![OFF_COLOR; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Presses or releases every keypad key to match the host keyboard.
    pub fn sync_keys(&self, emu: &mut Emulator) {
        let mut held = [false; 16];
        for num in self.window.get_keys().into_iter().filter_map(key_to_num) {
            held[num as usize] = true;
        }
        for (num, &down) in held.iter().enumerate() {
            if down {
                emu.press_key(num as u8);
            } else {
                emu.release_key(num as u8);
            }
        }
    }

    pub fn sync(&mut self, cells: &[u8]) -> Result<(), minifb::Error> {
        for (pixel, &cell) in self.pixel_buffer.iter_mut().zip(cells) {
            *pixel = if cell == 1 { ON_COLOR } else { OFF_COLOR };
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
    }
}

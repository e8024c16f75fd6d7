pub const KEY_COUNT: usize = 16;

/// Pressed state of the 16-key hex keypad, indexed 0x0..=0xF.
///
/// Written only by host input events; the engine reads it.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn press(&mut self, key: u8) {
        self.update_key(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.update_key(key, false);
    }

    fn update_key(&mut self, key: u8, pressed: bool) {
        match self.keys.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => log::warn!("ignoring event for key {key:#04x}, keypad has 16 keys"),
        }
    }

    /// Indices past 0xF are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Lowest-indexed key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|i| i as u8)
    }
}

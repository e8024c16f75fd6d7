use std::path::Path;

use rand::Rng;

use crate::{
    config::{Config, Quirks},
    decode::OpCodes,
    display::{FrameBuffer, HEIGHT, WIDTH},
    error::Chip8Error,
    keyboard::Keypad,
    memory::{Memory, TypeAddr, FONT_GLYPH_LEN, FONT_START},
    registers::Registers,
    timer::Timers,
};

/// The whole machine. Owned by the caller; nothing is global.
///
/// The host drives it with two independent signals: `step` at the instruction
/// rate and `tick_timers` at 60 Hz. Key events go through `press_key` and
/// `release_key`, rendering reads `display` and audio polls `sound_active`.
#[derive(Debug, Clone)]
pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    timers: Timers,
    keypad: Keypad,
    config: Config,
    halted: bool,
}

impl Emulator {
    pub fn init(config: Config) -> Result<Self, Chip8Error> {
        config.validate()?;
        log::debug!("configured with {:?}", config);
        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            timers: Timers::default(),
            keypad: Keypad::new(),
            config,
            halted: false,
        })
    }

    /// Resets every part of the machine and places `rom` at 0x200.
    ///
    /// On error nothing has been touched.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        let mem = Memory::with_rom(rom)?;
        self.mem = mem;
        self.regs = Registers::new();
        self.fb.clear_buffer();
        self.timers = Timers::default();
        self.keypad.reset();
        self.halted = false;
        log::debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<(), Chip8Error> {
        let rom = Memory::read_rom_file(path)?;
        self.load_rom(&rom)
    }

    pub fn quirks(&self) -> &Quirks {
        &self.config.quirks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetch_decode(&mut self) -> Result<OpCodes, Chip8Error> {
        let ins = self.mem.next_instruction()?;
        Ok(OpCodes::decode_raw(ins))
    }

    /// Runs one instruction. A fatal error halts the machine; every later call
    /// returns `Chip8Error::Halted` until a ROM is loaded again.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        let pc = self.mem.pc.0;
        let result = self.fetch_decode().and_then(|operation| {
            log::trace!("{pc:03X}: {operation:?}");
            self.execute_ins(operation)
        });
        if result.is_err() {
            self.halted = true;
        }
        result
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<(), Chip8Error> {
        let quirks = self.config.quirks;
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::PopSubroutine => {
                let Some(addr) = self.mem.stack.pop() else {
                    return Err(Chip8Error::StackUnderflow {
                        pc: self.mem.pc.0.wrapping_sub(2),
                    });
                };
                self.mem.set_pc(addr);
            }
            OpCodes::Jump(addr) => {
                self.mem.set_pc(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // pc already points past the call
                self.mem.stack.push(self.mem.pc.0)?;
                self.mem.set_pc(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // The flag is written after the result so VF holds the flag when X is F.
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, sum);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x > y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y > x);
            }
            OpCodes::RightShift(vx, vy) => {
                let source = self.shift_source(vx, vy);
                self.regs.set_register(vx, source >> 1);
                self.regs.set_flag(source & 1 == 1);
            }
            OpCodes::LeftShift(vx, vy) => {
                let source = self.shift_source(vx, vy);
                self.regs.set_register(vx, source << 1);
                self.regs.set_flag((source >> 7) & 1 == 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::JumpWithOffset(vx, addr) => {
                let offset_reg = if quirks.jump_offset_uses_vx { vx } else { 0x0 };
                self.mem.set_pc(addr + self.regs.get(offset_reg) as TypeAddr);
            }
            OpCodes::Random(vx, nn) => {
                let mut rng = rand::thread_rng();
                let ransuu: u8 = rng.gen_range(0..=255);
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                self.regs.set_flag(false);
                let sprite = self
                    .mem
                    .slice(self.mem.index.0 as usize, height as usize)?;
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keypad.is_pressed(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keypad.is_pressed(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.timers.delay.count)
            }
            OpCodes::CopyRegisterToDelay(vx) => self.timers.delay.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.timers.sound.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                // run this instruction again on the next step
                None => self.mem.decrement_pc(),
            },
            OpCodes::AddToIndex(vx) => {
                self.mem.index.add(self.regs.get(vx) as u16);
                if quirks.index_overflow_sets_vf {
                    self.regs.set_flag(self.mem.index.0 > 0xFFF);
                }
            }
            OpCodes::PointChar(vx) => {
                let glyph = self.regs.get(vx) as TypeAddr;
                self.mem.set_index(FONT_START + glyph * FONT_GLYPH_LEN);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = self.mem.slice_mut(self.mem.index.0 as usize, 3)?;
                digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let count = vx as usize + 1;
                let dest = self.mem.slice_mut(self.mem.index.0 as usize, count)?;
                dest.copy_from_slice(&self.regs.as_slice()[..count]);
                if quirks.load_store_increments_index {
                    self.mem.index.add(count as u16);
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let count = vx as usize + 1;
                let src = self.mem.slice(self.mem.index.0 as usize, count)?;
                for (reg, &reg_val) in src.iter().enumerate() {
                    self.regs.set_register(reg as u8, reg_val);
                }
                if quirks.load_store_increments_index {
                    self.mem.index.add(count as u16);
                }
            }
            OpCodes::Unimplemented(code) => {
                log::trace!("{code:04X} is not an instruction, skipping");
            }
        }
        Ok(())
    }

    fn shift_source(&self, vx: u8, vy: u8) -> u8 {
        if self.config.quirks.shift_reads_vy {
            self.regs.get(vy)
        } else {
            self.regs.get(vx)
        }
    }

    /// One period of the 60 Hz timer clock.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn press_key(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn release_key(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn display(&self) -> &[u8; WIDTH * HEIGHT] {
        self.fb.cells()
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound.is_active()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> u16 {
        self.mem.index.0
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn stack_depth(&self) -> usize {
        self.mem.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    fn emulator_with(quirks: Quirks, words: &[u16]) -> Emulator {
        let config = Config {
            quirks,
            ..Config::default()
        };
        let mut emu = Emulator::init(config).unwrap();
        emu.load_rom(&rom(words)).unwrap();
        emu
    }

    fn emulator(words: &[u16]) -> Emulator {
        emulator_with(Quirks::default(), words)
    }

    fn run(emu: &mut Emulator, steps: usize) {
        for _ in 0..steps {
            emu.step().unwrap();
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = Config {
            cycles_per_second: 0,
            ..Config::default()
        };
        assert!(matches!(
            Emulator::init(config),
            Err(Chip8Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_load_then_add() {
        let mut emu = emulator(&[0x6010, 0x7005]);
        run(&mut emu, 2);
        assert_eq!(emu.register(0x0), 0x15);
        assert_eq!(emu.pc(), 0x204);
    }

    #[test]
    fn test_add_immediate_wraps_without_flag() {
        let mut emu = emulator(&[0x60FF, 0x7002]);
        run(&mut emu, 2);
        assert_eq!(emu.register(0x0), 0x01);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn test_add_registers_carry() {
        let mut emu = emulator(&[0x60FF, 0x6101, 0x8014]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x0), 0x00);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn test_subtract_borrow() {
        let mut emu = emulator(&[0x6001, 0x6102, 0x8015]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x0), 0xFF);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn test_subtract_no_borrow() {
        let mut emu = emulator(&[0x6005, 0x6102, 0x8015]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x0), 0x03);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn test_subtract_backward() {
        let mut emu = emulator(&[0x6002, 0x6105, 0x8017, 0x6205, 0x6307, 0x8327]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x0), 0x03);
        assert_eq!(emu.register(0xF), 1);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x3), 0xFE);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn test_flag_wins_when_x_is_f() {
        let mut emu = emulator(&[0x6FFF, 0x6101, 0x8F14]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn test_bitwise_ops() {
        let mut emu = emulator(&[0x600C, 0x610A, 0x8011, 0x620C, 0x8212, 0x630C, 0x8313, 0x8400]);
        run(&mut emu, 8);
        assert_eq!(emu.register(0x0), 0x0E);
        assert_eq!(emu.register(0x2), 0x08);
        assert_eq!(emu.register(0x3), 0x06);
        assert_eq!(emu.register(0x4), 0x0E);
    }

    #[test]
    fn test_shift_reads_vy_by_default() {
        let mut emu = emulator(&[0x6181, 0x6202, 0x8126]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x1), 0x01);
        assert_eq!(emu.register(0xF), 0);

        let mut emu = emulator(&[0x6181, 0x6281, 0x812E]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x1), 0x02);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn test_shift_in_place_quirk() {
        let quirks = Quirks {
            shift_reads_vy: false,
            ..Quirks::default()
        };
        let mut emu = emulator_with(quirks, &[0x6181, 0x6202, 0x8126]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x1), 0x40);
        assert_eq!(emu.register(0xF), 1);

        let mut emu = emulator_with(quirks, &[0x6141, 0x6280, 0x812E]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x1), 0x82);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn test_skips() {
        // 3xkk taken, 4xkk not taken, 5xy0 taken, 9xy0 not taken
        let mut emu = emulator(&[0x6007, 0x6107, 0x3007, 0x0000, 0x4007, 0x5010, 0x0000, 0x9010]);
        run(&mut emu, 3);
        assert_eq!(emu.pc(), 0x208);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x20A);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x20E);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x210);
    }

    #[test]
    fn test_jump_and_set_index() {
        let mut emu = emulator(&[0x1300]);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x300);

        let mut emu = emulator(&[0xA2F0]);
        run(&mut emu, 1);
        assert_eq!(emu.index(), 0x2F0);
    }

    #[test]
    fn test_call_return_round_trip() {
        let mut emu = emulator(&[0x2206, 0x0000, 0x0000, 0x00EE]);
        let depth = emu.stack_depth();
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x206);
        assert_eq!(emu.stack_depth(), depth + 1);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x202);
        assert_eq!(emu.stack_depth(), depth);
    }

    #[test]
    fn test_stack_overflow_on_seventeenth_call() {
        // calls itself forever
        let mut emu = emulator(&[0x2200]);
        run(&mut emu, 16);
        assert_eq!(emu.stack_depth(), 16);
        assert!(matches!(emu.step(), Err(Chip8Error::StackOverflow { .. })));
        assert!(emu.is_halted());
        assert!(matches!(emu.step(), Err(Chip8Error::Halted)));
    }

    #[test]
    fn test_stack_underflow() {
        let mut emu = emulator(&[0x00EE]);
        assert!(matches!(
            emu.step(),
            Err(Chip8Error::StackUnderflow { pc: 0x200 })
        ));
        assert!(emu.is_halted());
    }

    #[test]
    fn test_reload_clears_halt() {
        let mut emu = emulator(&[0x00EE]);
        assert!(emu.step().is_err());
        emu.load_rom(&rom(&[0x6001])).unwrap();
        assert!(!emu.is_halted());
        run(&mut emu, 1);
        assert_eq!(emu.register(0x0), 1);
    }

    #[test]
    fn test_pc_past_end_of_memory() {
        let mut emu = emulator(&[0x1FFF]);
        run(&mut emu, 1);
        assert!(matches!(
            emu.step(),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_jump_with_offset_v0_by_default() {
        let mut emu = emulator(&[0x6002, 0x6305, 0xB300]);
        run(&mut emu, 3);
        assert_eq!(emu.pc(), 0x302);
    }

    #[test]
    fn test_jump_with_offset_vx_quirk() {
        let quirks = Quirks {
            jump_offset_uses_vx: true,
            ..Quirks::default()
        };
        let mut emu = emulator_with(quirks, &[0x6002, 0x6305, 0xB300]);
        run(&mut emu, 3);
        assert_eq!(emu.pc(), 0x305);
    }

    #[test]
    fn test_random_is_masked() {
        let mut emu = emulator(&[0x6533, 0xC500, 0xC60F]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0x5), 0);
        assert_eq!(emu.register(0x6) & 0xF0, 0);
    }

    #[test]
    fn test_draw_collision() {
        // glyph "0" row 0xF0, drawn twice at (0, 0); VF starts dirty
        let mut emu = emulator(&[0x6F09, 0xA050, 0xD011, 0xD011]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0xF), 0);
        assert_eq!(&emu.display()[..8], &[1, 1, 1, 1, 0, 0, 0, 0]);
        run(&mut emu, 1);
        assert_eq!(emu.register(0xF), 1);
        assert!(emu.display().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_draw_anchor_wraps() {
        // V0 = 66, V1 = 33 -> anchor (2, 1)
        let mut emu = emulator(&[0x6042, 0x6121, 0xA050, 0xD011]);
        run(&mut emu, 4);
        assert_eq!(emu.display()[WIDTH + 2], 1);
    }

    #[test]
    fn test_draw_sprite_out_of_memory() {
        let mut emu = emulator(&[0xAFFE, 0xD005]);
        run(&mut emu, 1);
        assert!(matches!(
            emu.step(),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_clear_screen() {
        let mut emu = emulator(&[0xA050, 0xD005, 0x00E0]);
        run(&mut emu, 2);
        assert!(emu.display().iter().any(|&c| c == 1));
        run(&mut emu, 1);
        assert!(emu.display().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_key_skips() {
        let mut emu = emulator(&[0x6A04, 0xEA9E, 0xEAA1, 0x0000, 0x0000]);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x204);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x208);

        let mut emu = emulator(&[0x6A04, 0xEA9E, 0x0000, 0xEAA1]);
        emu.press_key(0x4);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x206);
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x208);
    }

    #[test]
    fn test_wait_for_key() {
        let mut emu = emulator(&[0x6542, 0xF50A]);
        run(&mut emu, 1);
        for _ in 0..5 {
            run(&mut emu, 1);
            assert_eq!(emu.pc(), 0x202);
            assert_eq!(emu.register(0x5), 0x42);
        }
        emu.press_key(0x3);
        run(&mut emu, 1);
        assert_eq!(emu.register(0x5), 0x3);
        assert_eq!(emu.pc(), 0x204);
    }

    #[test]
    fn test_wait_for_key_latches_lowest() {
        let mut emu = emulator(&[0xF10A]);
        emu.press_key(0xE);
        emu.press_key(0x9);
        run(&mut emu, 1);
        assert_eq!(emu.register(0x1), 0x9);
    }

    #[test]
    fn test_timers_tick_only_on_timer_clock() {
        let mut emu = emulator(&[0x6005, 0xF015, 0xF107, 0xF107]);
        run(&mut emu, 3);
        assert_eq!(emu.delay_timer(), 5);
        assert_eq!(emu.register(0x1), 5);
        for _ in 0..5 {
            emu.tick_timers();
        }
        assert_eq!(emu.delay_timer(), 0);
        emu.tick_timers();
        assert_eq!(emu.delay_timer(), 0);
        run(&mut emu, 1);
        assert_eq!(emu.register(0x1), 0);
    }

    #[test]
    fn test_sound_active() {
        let mut emu = emulator(&[0x6002, 0xF018]);
        run(&mut emu, 2);
        assert!(emu.sound_active());
        emu.tick_timers();
        emu.tick_timers();
        assert!(!emu.sound_active());
        assert_eq!(emu.sound_timer(), 0);
    }

    #[test]
    fn test_add_to_index_default_leaves_vf() {
        let mut emu = emulator(&[0xAFFF, 0x6002, 0x6F07, 0xF01E]);
        run(&mut emu, 4);
        assert_eq!(emu.index(), 0x1001);
        assert_eq!(emu.register(0xF), 0x07);
    }

    #[test]
    fn test_add_to_index_overflow_quirk() {
        let quirks = Quirks {
            index_overflow_sets_vf: true,
            ..Quirks::default()
        };
        let mut emu = emulator_with(quirks, &[0xAFFF, 0x6002, 0xF01E, 0xA100, 0xF01E]);
        run(&mut emu, 3);
        assert_eq!(emu.index(), 0x1001);
        assert_eq!(emu.register(0xF), 1);
        run(&mut emu, 2);
        assert_eq!(emu.index(), 0x102);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn test_point_char() {
        let mut emu = emulator(&[0x600A, 0xF029]);
        run(&mut emu, 2);
        assert_eq!(emu.index(), 0x50 + 10 * 5);
    }

    #[test]
    fn test_bcd() {
        let mut emu = emulator(&[0x679D, 0xA300, 0xF733]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.slice(0x300, 3).unwrap(), &[1, 5, 7]);
        assert_eq!(emu.index(), 0x300);
    }

    #[test]
    fn test_bcd_out_of_memory_writes_nothing() {
        let mut emu = emulator(&[0x67FF, 0xAFFE, 0xF733]);
        run(&mut emu, 2);
        assert!(matches!(
            emu.step(),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
        assert_eq!(emu.mem.get(0xFFE).unwrap(), 0);
    }

    #[test]
    fn test_store_load_increments_index_by_default() {
        let mut emu = emulator(&[0x6001, 0x6102, 0x6203, 0xA300, 0xF255]);
        run(&mut emu, 5);
        assert_eq!(emu.mem.slice(0x300, 4).unwrap(), &[1, 2, 3, 0]);
        assert_eq!(emu.index(), 0x303);

        let mut emu = emulator(&[0xA050, 0xF265]);
        run(&mut emu, 2);
        assert_eq!(
            [emu.register(0), emu.register(1), emu.register(2), emu.register(3)],
            [0xF0, 0x90, 0x90, 0]
        );
        assert_eq!(emu.index(), 0x53);
    }

    #[test]
    fn test_store_load_index_unchanged_quirk() {
        let quirks = Quirks {
            load_store_increments_index: false,
            ..Quirks::default()
        };
        let mut emu = emulator_with(quirks, &[0x6009, 0xA300, 0xF055, 0xF165]);
        run(&mut emu, 4);
        assert_eq!(emu.mem.get(0x300).unwrap(), 9);
        assert_eq!(emu.index(), 0x300);
        assert_eq!(emu.register(0x0), 9);
        assert_eq!(emu.register(0x1), 0);
    }

    #[test]
    fn test_unimplemented_is_noop() {
        let mut emu = emulator(&[0x6011, 0x0123, 0x8018, 0xE0FF, 0xF0FF]);
        run(&mut emu, 5);
        assert_eq!(emu.pc(), 0x20A);
        assert_eq!(emu.register(0x0), 0x11);
        assert!(!emu.is_halted());
    }

    #[test]
    fn test_load_resets_state() {
        let mut emu = emulator(&[0x6F01, 0xA050, 0xD005, 0x6003, 0xF015, 0x2200]);
        emu.press_key(0x2);
        run(&mut emu, 6);
        emu.load_rom(&rom(&[0x00E0])).unwrap();
        assert_eq!(emu.pc(), 0x200);
        assert_eq!(emu.index(), 0);
        assert_eq!(emu.register(0xF), 0);
        assert_eq!(emu.stack_depth(), 0);
        assert_eq!(emu.delay_timer(), 0);
        assert!(emu.display().iter().all(|&c| c == 0));
        assert!(!emu.keypad.is_pressed(0x2));
        // the previous ROM's tail is gone
        assert_eq!(emu.mem.get(0x202).unwrap(), 0);
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut emu = emulator(&[0x6042, 0x1202]);
        run(&mut emu, 2);
        let too_big = vec![0; 3585];
        assert!(matches!(
            emu.load_rom(&too_big),
            Err(Chip8Error::RomTooLarge { .. })
        ));
        assert!(emu.load_rom_file("/no/such/rom.ch8").is_err());
        assert_eq!(emu.register(0x0), 0x42);
        assert_eq!(emu.pc(), 0x202);
        run(&mut emu, 1);
    }
}

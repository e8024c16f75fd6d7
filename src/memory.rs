use std::{fs, path::Path};

use crate::error::Chip8Error;
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_START: TypeAddr = 0x50;
pub const FONT_GLYPH_LEN: TypeAddr = 5;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_DEPTH: usize = 16;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// RAM plus the address-holding registers and the call stack.
///
/// 0x000 -> 0x04F is empty by convention, glyphs live at 0x050 -> 0x09F and
/// programs start at 0x200.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self {
            bytes,
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        }
    }

    pub fn get(&self, addr: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address: addr })
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<(), Chip8Error> {
        let byte = self
            .bytes
            .get_mut(addr)
            .ok_or(Chip8Error::MemoryOutOfBounds { address: addr })?;
        *byte = val;
        Ok(())
    }

    /// `len` bytes from `addr`, or the first address that falls outside RAM.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], Chip8Error> {
        Self::check_range(addr, len)?;
        Ok(&self.bytes[addr..addr + len])
    }

    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8], Chip8Error> {
        Self::check_range(addr, len)?;
        Ok(&mut self.bytes[addr..addr + len])
    }

    fn check_range(addr: usize, len: usize) -> Result<(), Chip8Error> {
        if addr + len > MEMORY_SIZE {
            let address = addr.max(MEMORY_SIZE);
            return Err(Chip8Error::MemoryOutOfBounds { address });
        }
        Ok(())
    }

    /// Reads the big-endian word at the program counter and moves past it.
    pub fn next_instruction(&mut self) -> Result<u16, Chip8Error> {
        let pc = self.pc.0 as usize;
        let word = self.slice(pc, 2)?;
        let ins = u16::from_be_bytes([word[0], word[1]]);
        self.pc.increment();
        Ok(ins)
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    /// Builds a fresh memory image with `bytes` at 0x200. Fails without
    /// producing anything when the ROM does not fit.
    pub fn with_rom(bytes: &[u8]) -> Result<Self, Chip8Error> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let mut mem = Self::new();
        let start_index = PROGRAM_START as usize;
        mem.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        Ok(mem)
    }

    pub fn read_rom_file(path: impl AsRef<Path>) -> Result<Vec<u8>, Chip8Error> {
        Ok(fs::read(path)?)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return addresses of the active calls, at most `STACK_DEPTH` deep.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), Chip8Error> {
        if self.addresses.len() >= STACK_DEPTH {
            return Err(Chip8Error::StackOverflow { pc: addr });
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }
}

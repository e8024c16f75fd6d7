use crate::memory::TypeAddr;

/// Everything that can stop the machine or refuse to start it.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("failed to read ROM: {0}")]
    RomIo(#[from] std::io::Error),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack overflow: 16 return addresses already stored, cannot push {pc:#05X}")]
    StackOverflow { pc: TypeAddr },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: TypeAddr },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("machine halted after a fatal error; load a ROM to restart")]
    Halted,
}

impl Chip8Error {
    /// Load failures leave the machine as it was; everything else is raised by
    /// a step and halts it.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Chip8Error::RomIo(_) | Chip8Error::RomTooLarge { .. })
    }
}

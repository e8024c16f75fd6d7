// 16 8-bit data registers named V0 to VF
// I -> address register
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// the host beeps while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// Separately driven by the host:
// CPU: `Emulator::step`, configurable rate (700 times per second by default)
// Timers: `Emulator::tick_timers`, 60 times per second

pub mod clock;
pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::{Config, Quirks};
pub use emulator::Emulator;
pub use error::Chip8Error;

use std::time::Duration;

use crate::error::Chip8Error;
use crate::timer::TIMER_DEC_PER_SECOND;

pub const DEFAULT_CYCLES_PER_SECOND: u32 = 700;

/// Behaviors that differ between the COSMAC VIP interpreter and later ones.
/// `Default` is the VIP behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6 / 8XYE shift VY into VX. When false VX is shifted in place.
    pub shift_reads_vy: bool,
    /// BNNN jumps to NNN + VX (X being the top nibble of NNN) instead of NNN + V0.
    pub jump_offset_uses_vx: bool,
    /// FX55 / FX65 leave I pointing just past the last register transferred.
    pub load_store_increments_index: bool,
    /// FX1E sets VF to 1 when I ends up past 0xFFF, 0 otherwise.
    pub index_overflow_sets_vf: bool,
}

impl Quirks {
    pub const fn cosmac_vip() -> Self {
        Self {
            shift_reads_vy: true,
            jump_offset_uses_vx: false,
            load_store_increments_index: true,
            index_overflow_sets_vf: false,
        }
    }

    /// What most interpreters written after the HP48 port do.
    pub const fn modern() -> Self {
        Self {
            shift_reads_vy: false,
            jump_offset_uses_vx: true,
            load_store_increments_index: false,
            index_overflow_sets_vf: true,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::cosmac_vip()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Rate of the instruction clock.
    pub cycles_per_second: u32,
    pub quirks: Quirks,
}

impl Config {
    pub fn validate(&self) -> Result<(), Chip8Error> {
        if self.cycles_per_second == 0 {
            return Err(Chip8Error::InvalidConfiguration(
                "instruction rate must be above zero".to_string(),
            ));
        }
        if (self.cycles_per_second as u64) < TIMER_DEC_PER_SECOND {
            return Err(Chip8Error::InvalidConfiguration(format!(
                "instruction rate {} Hz is below the {} Hz timer rate",
                self.cycles_per_second, TIMER_DEC_PER_SECOND
            )));
        }
        Ok(())
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.cycles_per_second.max(1) as u64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
            quirks: Quirks::default(),
        }
    }
}

use std::{thread, time::Instant};

use anyhow::Context;
use chip8_vm::clock::{Clock, Signal};
use chip8_vm::{Config, Emulator};

use frontend::Frontend;
use sound::Beeper;

mod frontend;
mod sound;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let rom = std::env::args().nth(1).context("supply a rom file")?;
    let config = Config::default();
    let mut emu = Emulator::init(config)?;
    emu.load_rom_file(&rom)
        .with_context(|| format!("could not load {rom}"))?;

    let mut frontend = Frontend::new()?;
    let mut beeper = match Beeper::new() {
        Ok(beeper) => Some(beeper),
        Err(err) => {
            log::warn!("running without sound: {err:#}");
            None
        }
    };

    // one loop, two clocks: instructions at the configured rate, timers and
    // everything host facing at 60 Hz
    let mut clock = Clock::new(config.cycle_interval(), Instant::now());
    while frontend.is_running() {
        match clock.poll(Instant::now()) {
            Some(Signal::Cycle) => {
                if let Err(err) = emu.step() {
                    log::error!("halted at {:03X}: {err}", emu.pc());
                    return Err(err.into());
                }
            }
            Some(Signal::Timer) => {
                emu.tick_timers();
                frontend.sync_keys(&mut emu);
                frontend.sync(emu.display())?;
                if let Some(beeper) = beeper.as_mut() {
                    beeper.set_active(emu.sound_active());
                }
            }
            None => thread::sleep(clock.until_next(Instant::now())),
        }
    }
    Ok(())
}

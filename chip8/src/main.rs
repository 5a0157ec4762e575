use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use chip8_core::constants::{CYCLES_PER_FRAME, FRAME_RATE};
use keymap::Layout;

mod keymap;
mod run;

const SCALE: u32 = 10;

/// Runs a CHIP-8 ROM in an SDL2 window.
///
/// Keys: Escape quits, P pauses, F5 resets and reloads the ROM, and holding
/// Space runs without frame throttling.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instruction cycles run per frame
    #[arg(long, default_value_t = CYCLES_PER_FRAME)]
    cycles_per_frame: usize,

    /// Frames, and timer decrements, per second
    #[arg(long, default_value_t = FRAME_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    frame_rate: u32,

    /// Window pixels per CHIP-8 pixel
    #[arg(long, default_value_t = SCALE, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Which keys stand in for the hex keypad
    #[arg(long, value_enum, default_value_t = Layout::Qwerty)]
    layout: Layout,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run::run(&args)
}

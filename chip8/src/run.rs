use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::{Chip8, Chip8Error};
use chip8_display::Display;

use crate::keymap::Keymap;
use crate::Args;

pub fn run(args: &Args) -> anyhow::Result<()> {
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    load(&mut chip8, &args.rom)?;
    let keymap = Keymap::new(args.layout);

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = Display::new(&sdl, args.scale)?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    let frame_time = Duration::from_secs(1) / args.frame_rate;

    // Whether or not the frame rate should be respected
    let mut fast_forward = false;
    // Whether cycles and timers are being driven at all
    let mut paused = false;

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown { repeat: true, .. } => continue,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap.get(key)) {
                    (_, Some(kc)) => chip8.key_press(kc)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::P, _) => {
                        paused = !paused;
                        info!("{}", if paused { "paused" } else { "resumed" });
                    }
                    (Keycode::F5, _) => match load(&mut chip8, &args.rom) {
                        Ok(()) => paused = false,
                        Err(e) => {
                            error!("{:#}", e);
                            paused = true;
                        }
                    },
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap.get(key)) {
                    (_, Some(kc)) => chip8.key_release(kc)?,
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if !paused {
            if let Err(e) = step_frame(&mut chip8, args.cycles_per_frame) {
                error!("{} at pc {:04X}, pausing", e, chip8.state().pc);
                paused = true;
            }
        }

        // If the frame changed, render it
        if let Some(frame) = chip8.take_frame() {
            display.render(frame)?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if !fast_forward && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}

/// Runs one frame's worth of cycles followed by a single timer tick.
///
/// A fault stops the frame where it happened and skips the tick, so the timers
/// still hold the values they had at the fault.
fn step_frame(chip8: &mut Chip8, cycles: usize) -> Result<(), Chip8Error> {
    for _ in 0..cycles {
        chip8.cycle()?;
    }
    chip8.decrement_timers();
    Ok(())
}

/// Resets the machine and loads the rom at `path` into it
fn load(chip8: &mut Chip8, path: &Path) -> anyhow::Result<()> {
    let file =
        File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    chip8.reset();
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load {}", path.display()))?;
    info!("successfully loaded {}", path.display());
    Ok(())
}

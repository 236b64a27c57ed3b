use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn};

use chip8::audio::Buzzer;
use chip8::config::Config;
use chip8::display::Display;
use chip8::input::{Input, InputAction};
use chip8::Chip8;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    let mut cpu = Chip8::new();
    cpu.load_rom(&config.rom)
        .with_context(|| format!("failed to load {}", config.rom.display()))?;

    let sdl_context = sdl2::init().map_err(|e| anyhow!(e)).context("SDL init")?;
    let mut display = Display::new(&sdl_context, config.scale)
        .map_err(|e| anyhow!(e))
        .context("creating window")?;
    let mut input = Input::new(&sdl_context)
        .map_err(|e| anyhow!(e))
        .context("opening event pump")?;
    let mut buzzer = match Buzzer::new(&sdl_context) {
        Ok(buzzer) => Some(buzzer),
        Err(e) => {
            warn!("no audio: {}", e);
            None
        }
    };

    main_chip_loop(&mut cpu, &config, &mut display, &mut input, buzzer.as_mut())
}

fn main_chip_loop(
    cpu: &mut Chip8,
    config: &Config,
    display: &mut Display,
    input: &mut Input,
    mut buzzer: Option<&mut Buzzer>,
) -> Result<()> {
    let frame_interval = config.frame_interval();
    info!(
        "running {} cycles every {:?}",
        config.cycles_per_frame, frame_interval
    );

    'mainloop: loop {
        let frame_start = Instant::now();

        if InputAction::BreakDisplay == input.handle_input() {
            break 'mainloop;
        }
        cpu.set_keypad(input.key_pad);

        cpu.run_cycles(config.cycles_per_frame)
            .with_context(|| format!("halted at {:#05x}", cpu.pc()))?;

        if let Some(buzzer) = buzzer.as_deref_mut() {
            buzzer.set_active(cpu.sound_active());
        }
        display.render(cpu.video()).map_err(|e| anyhow!(e))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_CYCLES_PER_FRAME: u32 = 10;
pub const DEFAULT_FRAME_MS: u64 = 16;
pub const DEFAULT_SCALE: u32 = 10;

/// Settings owned by the frame driver. The interpreter itself never sees these.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
pub struct Config {
    /// Instructions executed between two rendered frames
    #[arg(short, long, default_value_t = DEFAULT_CYCLES_PER_FRAME,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles_per_frame: u32,

    /// Target frame interval in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_FRAME_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub frame_ms: u64,

    /// Window pixels per CHIP-8 pixel
    #[arg(short, long, default_value_t = DEFAULT_SCALE,
          value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Path to the ROM file to run
    pub rom: PathBuf,
}

impl Config {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

//! CHIP-8 interpreter.
//!
//! The core is [`chip::Chip8`]: it owns memory, registers, stack, timers and
//! the 64x32 video buffer, and advances one instruction per
//! [`tick`](chip::Chip8::tick). Rendering, audio, keyboard mapping and frame
//! pacing live in the SDL2 frontend (`frontend` feature) and only talk to the
//! core through the video/sound/keypad accessors.

pub mod chip;
pub mod config;
pub mod error;
pub mod instruction;
pub mod memory;

#[cfg(feature = "frontend")]
pub mod audio;
#[cfg(feature = "frontend")]
pub mod display;
#[cfg(feature = "frontend")]
pub mod input;

pub use chip::Chip8;
pub use error::{LoadError, RuntimeError};

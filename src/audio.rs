use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::Sdl;

const SAMPLE_RATE: i32 = 44100;
const TONE_HZ: f32 = 180.0;
const VOLUME: f32 = 0.25;

/// Square wave generator fed to SDL's audio thread.
pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Buzzer driven by the sound timer: on while it is nonzero.
pub struct Buzzer {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Buzzer {
    pub fn new(sdl_context: &Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl_context.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: Some(1024),
        };

        let device = audio_subsystem.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_HZ / spec.freq as f32,
            phase: 0.0,
            volume: VOLUME,
        })?;

        Ok(Buzzer {
            device,
            playing: false,
        })
    }

    pub fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.playing = active;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_square_wave_shape() {
        // four samples per period
        let mut wave = SquareWave {
            phase_inc: 0.25,
            phase: 0.0,
            volume: 0.5,
        };
        let mut out = [0.0f32; 8];
        wave.callback(&mut out);
        assert_eq!(out, [0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, -0.5]);
    }
}

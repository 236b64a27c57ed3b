use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;

use crate::chip::{VIDEO_HEIGHT, VIDEO_WIDTH};

const PIXEL_OFF_COLOR: Color = Color::RGB(0x99, 0x66, 0x01);
//const PIXEL_OFF_COLOR: Color = Color::RGB(0x0, 0x0, 0x0);
const PIXEL_ON_COLOR: Color = Color::RGB(0xff, 0xcc, 0x01);

/// SDL window showing the 64x32 video buffer, each CHIP-8 pixel drawn as a
/// `scale` x `scale` square.
pub struct Display {
    canvas: Canvas<Window>,
    scale: u32,
}

impl Display {
    pub fn new(sdl_context: &Sdl, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl_context.video()?;
        let window = video_subsystem
            .window(
                "CHIP-8",
                VIDEO_WIDTH as u32 * scale,
                VIDEO_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;

        let mut screen = Display { canvas, scale };
        screen.clear();
        screen.canvas.present();

        Ok(screen)
    }

    fn clear(&mut self) {
        self.canvas.set_draw_color(PIXEL_OFF_COLOR);
        self.canvas.clear();
    }

    /// Redraw the whole frame from a row-major on/off buffer.
    pub fn render(&mut self, video: &[bool]) -> Result<(), String> {
        self.clear();

        let scale = self.scale;
        let lit: Vec<Rect> = video
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| {
                let x = (i % VIDEO_WIDTH) as i32 * scale as i32;
                let y = (i / VIDEO_WIDTH) as i32 * scale as i32;
                Rect::new(x, y, scale, scale)
            })
            .collect();

        self.canvas.set_draw_color(PIXEL_ON_COLOR);
        self.canvas.fill_rects(&lit)?;
        self.canvas.present();
        Ok(())
    }
}

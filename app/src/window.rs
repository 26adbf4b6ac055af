use crate::persist::WindowPosition;
use anyhow::anyhow;
use lazy_static::lazy_static;
use sdl2::{
    EventPump,
    render::{Canvas, TextureCreator},
    ttf::{Font, Sdl2TtfContext},
    video::{Window as SdlWindow, WindowContext},
};
use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

lazy_static! {
    static ref TTF_CONTEXT: Result<Sdl2TtfContext, String> = sdl2::ttf::init();
}

const FONT_PT_SIZE: u16 = 14;

// Fonts tried in order when no font is given on the command line.
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

fn load_font(
    path: Option<&Path>,
) -> anyhow::Result<Option<Font<'static, 'static>>> {
    let ttf_context = TTF_CONTEXT.as_ref().map_err(|e| anyhow!("{e}"))?;
    if let Some(path) = path {
        let font = ttf_context
            .load_font(path, FONT_PT_SIZE)
            .map_err(|e| anyhow!("{e}"))?;
        return Ok(Some(font));
    }
    for path in FALLBACK_FONT_PATHS {
        if let Ok(font) = ttf_context.load_font(path, FONT_PT_SIZE) {
            return Ok(Some(font));
        }
    }
    log::warn!("no usable font found; key labels will not be drawn");
    Ok(None)
}

pub struct Window {
    pub canvas: Canvas<SdlWindow>,
    pub event_pump: EventPump,
    pub font: Option<Font<'static, 'static>>,
    pub texture_creator: TextureCreator<WindowContext>,
    pub prev_tick_complete: Instant,
    width_px: u32,
    height_px: u32,
}

impl Window {
    pub fn new(
        title: &str,
        width_px: u32,
        height_px: u32,
        font_path: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let mut window_builder =
            video_subsystem.window(title, width_px, height_px);
        if let Some(WindowPosition { x, y }) = WindowPosition::load() {
            window_builder.position(x, y);
        } else {
            window_builder.position_centered();
        }
        let window = window_builder.build()?;
        let canvas = window
            .into_canvas()
            .target_texture()
            .present_vsync()
            .build()?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        Ok(Self {
            canvas,
            event_pump,
            font: load_font(font_path)?,
            texture_creator,
            prev_tick_complete: Instant::now(),
            width_px,
            height_px,
        })
    }

    pub fn wait_until_next_frame(&self) {
        if let Some(period_to_sleep) = (self.prev_tick_complete
            + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn save_position(&self, x: i32, y: i32) {
        WindowPosition { x, y }.save();
    }
}

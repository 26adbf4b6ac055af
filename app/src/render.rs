use crate::{
    face::{Mouth, mouth},
    window::Window,
};
use anyhow::anyhow;
use clavier_keyboard::{KeyColor, KeyRegion, KeyboardState};
use sdl2::{pixels::Color, rect::Rect};

/// Fraction of the window height taken up by the singer above the keys.
pub const FACE_HEIGHT_RATIO: f32 = 0.25;

const BACKGROUND: Color = Color::RGB(40, 40, 48);
const WHITE_KEY: Color = Color::RGB(245, 245, 245);
const WHITE_KEY_PRESSED: Color = Color::RGB(160, 200, 255);
const BLACK_KEY: Color = Color::RGB(24, 24, 24);
const BLACK_KEY_PRESSED: Color = Color::RGB(90, 120, 170);
const KEY_BORDER: Color = Color::RGB(60, 60, 60);
const SKIN: Color = Color::RGB(235, 190, 140);
const FEATURE: Color = Color::RGB(30, 30, 30);

/// Pixel rectangle of the keyboard area within the window.
fn keyboard_rect(width_px: u32, height_px: u32) -> Rect {
    let top = (height_px as f32 * FACE_HEIGHT_RATIO) as i32;
    Rect::new(0, top, width_px, height_px - top as u32)
}

/// Maps a window pixel position into keyboard-area coordinates normalized
/// to 0..1. Positions above the keyboard produce a negative y.
pub fn normalize_pointer(
    x_px: i32,
    y_px: i32,
    width_px: u32,
    height_px: u32,
) -> (f32, f32) {
    let keyboard = keyboard_rect(width_px, height_px);
    (
        x_px as f32 / keyboard.width() as f32,
        (y_px - keyboard.y()) as f32 / keyboard.height() as f32,
    )
}

fn region_to_rect(region: KeyRegion, keyboard: Rect) -> Rect {
    Rect::new(
        keyboard.x() + (region.x_01 * keyboard.width() as f32) as i32,
        keyboard.y() + (region.y_01 * keyboard.height() as f32) as i32,
        (region.width_01 * keyboard.width() as f32) as u32,
        (region.height_01 * keyboard.height() as f32) as u32,
    )
}

pub fn render(
    window: &mut Window,
    state: &KeyboardState,
) -> anyhow::Result<()> {
    let (width_px, height_px) =
        window.canvas.output_size().map_err(|e| anyhow!("{e}"))?;
    window.canvas.set_draw_color(BACKGROUND);
    window.canvas.clear();
    let keyboard = keyboard_rect(width_px, height_px);
    render_keys(window, state, keyboard, KeyColor::White)?;
    render_keys(window, state, keyboard, KeyColor::Black)?;
    render_face(window, mouth(state.any_held()), width_px, height_px)?;
    window.canvas.present();
    Ok(())
}

/// Draws all keys of one color. White keys are drawn first so the black
/// keys overlap them, matching the hit-test order.
fn render_keys(
    window: &mut Window,
    state: &KeyboardState,
    keyboard: Rect,
    color: KeyColor,
) -> anyhow::Result<()> {
    for (i, key) in state.layout().keys().iter().enumerate() {
        if key.color != color {
            continue;
        }
        let rect = region_to_rect(state.geometry().region(i), keyboard);
        let fill = match (color, state.is_pressed(i)) {
            (KeyColor::White, false) => WHITE_KEY,
            (KeyColor::White, true) => WHITE_KEY_PRESSED,
            (KeyColor::Black, false) => BLACK_KEY,
            (KeyColor::Black, true) => BLACK_KEY_PRESSED,
        };
        window.canvas.set_draw_color(fill);
        window.canvas.fill_rect(rect).map_err(|e| anyhow!("{e}"))?;
        window.canvas.set_draw_color(KEY_BORDER);
        window.canvas.draw_rect(rect).map_err(|e| anyhow!("{e}"))?;
        render_label(window, key.binding.label().as_str(), color, rect)?;
    }
    Ok(())
}

fn render_label(
    window: &mut Window,
    label: &str,
    color: KeyColor,
    key_rect: Rect,
) -> anyhow::Result<()> {
    let Some(font) = window.font.as_ref() else {
        return Ok(());
    };
    let text_color = match color {
        KeyColor::White => Color::RGB(40, 40, 40),
        KeyColor::Black => Color::RGB(220, 220, 220),
    };
    let text_surface = font
        .render(label)
        .blended(text_color)
        .map_err(|e| anyhow!("{e}"))?;
    let text_texture = text_surface.as_texture(&window.texture_creator)?;
    let query = text_texture.query();
    let text_rect = Rect::new(
        key_rect.x() + (key_rect.width() as i32 - query.width as i32) / 2,
        key_rect.y() + key_rect.height() as i32
            - query.height as i32
            - key_rect.height() as i32 / 12,
        query.width,
        query.height,
    );
    window
        .canvas
        .copy(&text_texture, None, Some(text_rect))
        .map_err(|e| anyhow!("{e}"))
}

/// A boxy face centered in the strip above the keys. The mouth is a thin
/// line when closed and a tall open rectangle while any note sounds.
fn render_face(
    window: &mut Window,
    mouth: Mouth,
    width_px: u32,
    height_px: u32,
) -> anyhow::Result<()> {
    let strip_height = (height_px as f32 * FACE_HEIGHT_RATIO) as i32;
    let head_size = (strip_height * 3) / 4;
    let head = Rect::new(
        (width_px as i32 - head_size) / 2,
        (strip_height - head_size) / 2,
        head_size as u32,
        head_size as u32,
    );
    window.canvas.set_draw_color(SKIN);
    window.canvas.fill_rect(head).map_err(|e| anyhow!("{e}"))?;
    window.canvas.set_draw_color(FEATURE);
    let eye_size = (head_size / 8).max(2) as u32;
    for eye_dx in [head_size / 4, (head_size * 3) / 4] {
        let eye = Rect::new(
            head.x() + eye_dx - eye_size as i32 / 2,
            head.y() + head_size / 3 - eye_size as i32 / 2,
            eye_size,
            eye_size,
        );
        window.canvas.fill_rect(eye).map_err(|e| anyhow!("{e}"))?;
    }
    let mouth_width = (head_size / 2) as u32;
    let mouth_height = match mouth {
        Mouth::Closed => (head_size / 16).max(2) as u32,
        Mouth::Open => (head_size / 4) as u32,
    };
    let mouth_rect = Rect::new(
        head.x() + (head_size - mouth_width as i32) / 2,
        head.y() + (head_size * 3) / 4 - mouth_height as i32 / 2,
        mouth_width,
        mouth_height,
    );
    window
        .canvas
        .fill_rect(mouth_rect)
        .map_err(|e| anyhow!("{e}"))
}

mod face;
mod input;
mod persist;
mod render;
mod window;

use clap::Parser;
use clavier_keyboard::{KeyboardState, Layout};
use clavier_sampler::{SampleBank, Sampler, default_manifest};
use sdl2::event::{Event, WindowEvent};
use std::{path::PathBuf, time::Instant};

#[derive(Parser)]
#[command(name = "clavier")]
#[command(
    about = "A piano keyboard played with the computer keyboard and mouse"
)]
struct Cli {
    /// Directory containing the note samples (1_C4.wav through 15_C6.wav)
    #[arg(short, long, default_value = "samples")]
    samples: PathBuf,
    #[arg(short, long, default_value = "clavier")]
    title: String,
    #[arg(long, default_value_t = 960)]
    width_px: u32,
    #[arg(long, default_value_t = 360)]
    height_px: u32,
    /// Path to a ttf font for key labels. Falls back to common system
    /// fonts when omitted.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Target audio latency in seconds
    #[arg(long, default_value_t = 0.01)]
    latency_s: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let bank = SampleBank::load(&cli.samples, &default_manifest())?;
    let sampler = Sampler::new(
        bank,
        clavier_sampler::Config {
            target_latency_s: cli.latency_s,
        },
    )?;
    let mut state = KeyboardState::new(Layout::reference());
    let mut window = window::Window::new(
        cli.title.as_str(),
        cli.width_px,
        cli.height_px,
        cli.font.as_deref(),
    )?;
    let mut commands = Vec::new();
    let mut events = Vec::new();
    loop {
        window.wait_until_next_frame();
        events.extend(window.event_pump.poll_iter());
        let (width_px, height_px) = (window.width_px(), window.height_px());
        for event in events.drain(..) {
            match &event {
                Event::Quit { .. } => return Ok(()),
                Event::Window {
                    win_event: WindowEvent::Moved(x, y),
                    ..
                } => window.save_position(*x, *y),
                _ => (),
            }
            if let Some(input_event) = input::translate_event(&event, |x, y| {
                render::normalize_pointer(x, y, width_px, height_px)
            }) {
                state.handle_event(input_event, &mut commands);
            }
        }
        for command in commands.drain(..) {
            sampler.send(command);
        }
        render::render(&mut window, &state)?;
        window.prev_tick_complete = Instant::now();
    }
}

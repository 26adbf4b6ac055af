pub mod bank;
pub mod mixer;

pub use bank::{Sample, SampleBank, default_manifest};
pub use mixer::Mixer;

use clavier_keyboard::{AudioCommand, Note};
use cpal::{
    BufferSize, Device, OutputCallbackInfo, StreamConfig, SupportedBufferSize,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use std::sync::mpsc;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.01
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.01,
        }
    }
}

/// Plays samples on the default output device in response to attack and
/// release commands. Commands are forwarded over a channel and drained by
/// the audio callback at the start of each buffer.
pub struct Sampler {
    sender: mpsc::Sender<AudioCommand>,
    // Held to keep the output stream alive for the lifetime of the sampler.
    _stream: cpal::Stream,
}

impl Sampler {
    pub fn new(bank: SampleBank, config: Config) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        let stream_config = choose_config(&device, config)?;
        log::info!("sample rate: {}", stream_config.sample_rate.0);
        log::info!("num channels: {}", stream_config.channels);
        log::info!("buffer size: {:?}", stream_config.buffer_size);
        let mut mixer =
            Mixer::new(bank, stream_config.sample_rate.0 as f32);
        let (sender, receiver) = mpsc::channel::<AudioCommand>();
        let channels = stream_config.channels as usize;
        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                for command in receiver.try_iter() {
                    match command {
                        AudioCommand::Attack(note) => mixer.attack(note),
                        AudioCommand::Release(note) => mixer.release(note),
                    }
                }
                for frame in data.chunks_mut(channels) {
                    let sample = mixer.next_sample();
                    for element in frame {
                        *element = sample;
                    }
                }
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(Self {
            sender,
            _stream: stream,
        })
    }

    /// Starts playing `note`. Infallible so input handling never has to
    /// care about the state of the audio thread.
    pub fn attack(&self, note: Note) {
        if self.sender.send(AudioCommand::Attack(note)).is_err() {
            log::warn!("audio stream stopped; dropping attack for {}", note);
        }
    }

    pub fn release(&self, note: Note) {
        if self.sender.send(AudioCommand::Release(note)).is_err() {
            log::warn!("audio stream stopped; dropping release for {}", note);
        }
    }

    pub fn send(&self, command: AudioCommand) {
        match command {
            AudioCommand::Attack(note) => self.attack(note),
            AudioCommand::Release(note) => self.release(note),
        }
    }
}

fn choose_config(
    device: &Device,
    config: Config,
) -> anyhow::Result<StreamConfig> {
    let default_config = device.default_output_config()?;
    let sample_rate = default_config.sample_rate();
    let channels = default_config.channels().min(2).max(1) as u32;
    let ideal_buffer_size =
        (sample_rate.0 as f32 * config.target_latency_s) as u32 * channels;
    // Round down to a multiple of 4. It's not clear why this is necessary but alsa complains
    // if the buffer size is not evenly divisible by 4.
    let ideal_buffer_size = ideal_buffer_size & (!3);
    let buffer_size = match default_config.buffer_size() {
        SupportedBufferSize::Range { min, max } => {
            let frame_count = if ideal_buffer_size < *min {
                *min
            } else if ideal_buffer_size > *max {
                *max
            } else {
                ideal_buffer_size
            };
            BufferSize::Fixed(frame_count)
        }
        SupportedBufferSize::Unknown => BufferSize::Default,
    };
    Ok(StreamConfig {
        channels: channels as u16,
        sample_rate,
        buffer_size,
    })
}

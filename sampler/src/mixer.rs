//! The voice mixer. Pure sample arithmetic with no audio-device types, so
//! the attack/release/retrigger semantics can be tested without a stream.
use crate::bank::SampleBank;
use clavier_keyboard::{Note, semitone_ratio};
use std::sync::Arc;

/// How long a released voice takes to fade to silence.
const RELEASE_S: f32 = 0.2;

#[derive(Debug)]
struct Voice {
    note: Note,
    data: Arc<Vec<f32>>,
    position: f32,
    /// Source samples consumed per output sample. Encodes both the pitch
    /// shift from the nearest sampled note and any sample-rate mismatch
    /// between the wav file and the output stream.
    step: f32,
    gain: f32,
    releasing: bool,
}

impl Voice {
    fn is_finished(&self) -> bool {
        self.gain <= 0.0 || self.position as usize >= self.data.len()
    }
}

#[derive(Debug)]
pub struct Mixer {
    bank: SampleBank,
    voices: Vec<Voice>,
    output_sample_rate_hz: f32,
    /// Gain subtracted per output sample while a voice is releasing.
    release_step: f32,
}

impl Mixer {
    pub fn new(bank: SampleBank, output_sample_rate_hz: f32) -> Self {
        Self {
            bank,
            voices: Vec::new(),
            output_sample_rate_hz,
            release_step: 1.0 / (RELEASE_S * output_sample_rate_hz),
        }
    }

    /// Starts a voice for `note`, replacing any voice already playing it
    /// (pressing a key that is still ringing retriggers its sample from the
    /// start). Notes without a sample of their own play the nearest sampled
    /// note rate-shifted by the semitone distance.
    pub fn attack(&mut self, note: Note) {
        let Some((source, sample)) = self.bank.nearest(note) else {
            log::warn!("no sample available for {}", note);
            return;
        };
        let step = semitone_ratio(note.semitones_from(source) as f32)
            * (sample.sample_rate_hz as f32 / self.output_sample_rate_hz);
        let voice = Voice {
            note,
            data: Arc::clone(&sample.data),
            position: 0.0,
            step,
            gain: 1.0,
            releasing: false,
        };
        self.voices.retain(|v| v.note != note);
        self.voices.push(voice);
    }

    /// Begins fading out the voice for `note`. Releasing a note that isn't
    /// playing is a no-op.
    pub fn release(&mut self, note: Note) {
        for voice in &mut self.voices {
            if voice.note == note {
                voice.releasing = true;
            }
        }
    }

    /// Produces the next output sample, advancing and reaping voices.
    pub fn next_sample(&mut self) -> f32 {
        let mut acc = 0.0;
        for voice in &mut self.voices {
            if let Some(&sample) = voice.data.get(voice.position as usize) {
                acc += sample * voice.gain;
            }
            voice.position += voice.step;
            if voice.releasing {
                voice.gain -= self.release_step;
            }
        }
        self.voices.retain(|voice| !voice.is_finished());
        acc.clamp(-1.0, 1.0)
    }

    pub fn is_silent(&self) -> bool {
        self.voices.is_empty()
    }

    #[cfg(test)]
    fn num_voices(&self) -> usize {
        self.voices.len()
    }
}

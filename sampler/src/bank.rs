//! Loading and lookup of the per-note sample set.
use anyhow::anyhow;
use clavier_keyboard::{Note, NoteName};
use hound::{SampleFormat, WavReader};
use std::{collections::HashMap, fs, io::BufReader, path::Path, sync::Arc};

/// A decoded mono sample track.
#[derive(Debug, Clone)]
pub struct Sample {
    pub data: Arc<Vec<f32>>,
    pub sample_rate_hz: u32,
}

fn parse_wav_mono(buffer: &[u8]) -> anyhow::Result<Sample> {
    let mut reader = WavReader::new(BufReader::new(buffer))?;
    let spec = reader.spec();
    let data = match spec.sample_format {
        SampleFormat::Float => {
            let data_f32 = reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?;
            data_f32
                .chunks(spec.channels as usize)
                .map(|chunk| {
                    chunk.iter().sum::<f32>() / chunk.len() as f32
                })
                .collect::<Vec<_>>()
        }
        SampleFormat::Int => {
            let max_value = 1i64 << (spec.bits_per_sample - 1);
            let data_int = reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?;
            data_int
                .chunks(spec.channels as usize)
                .map(|chunk| {
                    let channel_mean =
                        chunk.iter().map(|&x| x as i64).sum::<i64>()
                            / chunk.len() as i64;
                    channel_mean as f32 / max_value as f32
                })
                .collect::<Vec<_>>()
        }
    };
    Ok(Sample {
        data: Arc::new(data),
        sample_rate_hz: spec.sample_rate,
    })
}

/// The sample set used by the original asset pack: one file per white key
/// from C4 to C6, named by its 1-based position, e.g. "1_C4.wav" and
/// "15_C6.wav". Black keys have no file of their own and are played by
/// rate-shifting the nearest sampled note.
pub fn default_manifest() -> Vec<(Note, String)> {
    let mut manifest = Vec::new();
    let mut note = Note::new(NoteName::C, 4);
    while note <= Note::C_6 {
        if !note.note_name().is_accidental() {
            manifest.push((note, format!("{}_{}.wav", manifest.len() + 1, note)));
        }
        note = note.add_semitones(1);
    }
    manifest
}

/// The samples available for playback, keyed by note.
#[derive(Debug, Clone, Default)]
pub struct SampleBank {
    samples: HashMap<Note, Sample>,
}

impl SampleBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every sample named by the manifest from `dir`.
    pub fn load(
        dir: impl AsRef<Path>,
        manifest: &[(Note, String)],
    ) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut bank = Self::new();
        for (note, file_name) in manifest {
            let path = dir.join(file_name);
            let raw = fs::read(&path).map_err(|e| {
                anyhow!("failed to read sample {}: {}", path.display(), e)
            })?;
            let sample = parse_wav_mono(&raw).map_err(|e| {
                anyhow!("failed to decode sample {}: {}", path.display(), e)
            })?;
            bank.insert(*note, sample);
        }
        log::info!(
            "loaded {} samples from {}",
            bank.samples.len(),
            dir.display()
        );
        Ok(bank)
    }

    pub fn insert(&mut self, note: Note, sample: Sample) {
        self.samples.insert(note, sample);
    }

    pub fn get(&self, note: Note) -> Option<&Sample> {
        self.samples.get(&note)
    }

    /// The sampled note closest to `note` in pitch, preferring the lower
    /// note on a tie. This is how notes without a sample of their own (the
    /// black keys in the default manifest) get played.
    pub fn nearest(&self, note: Note) -> Option<(Note, &Sample)> {
        self.samples
            .iter()
            .min_by_key(|&(&candidate, _)| {
                (note.semitones_from(candidate).abs(), candidate)
            })
            .map(|(&candidate, sample)| (candidate, sample))
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(path: &Path, samples: &[i16], channels: u16) {
        let spec = WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn default_manifest_names_the_fifteen_white_keys() {
        let manifest = default_manifest();
        assert_eq!(manifest.len(), 15);
        assert_eq!(manifest[0], (Note::C_4, "1_C4.wav".to_string()));
        assert_eq!(manifest[7], (Note::C_5, "8_C5.wav".to_string()));
        assert_eq!(manifest[14], (Note::C_6, "15_C6.wav".to_string()));
    }

    #[test]
    fn load_decodes_and_normalizes_int_samples() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("1_C4.wav"), &[0, i16::MAX, i16::MIN], 1);
        let manifest = vec![(Note::C_4, "1_C4.wav".to_string())];
        let bank = SampleBank::load(dir.path(), &manifest).unwrap();
        let sample = bank.get(Note::C_4).unwrap();
        assert_eq!(sample.sample_rate_hz, 44100);
        assert_eq!(sample.data.len(), 3);
        assert_eq!(sample.data[0], 0.0);
        assert!((sample.data[1] - 1.0).abs() < 1e-3);
        assert!((sample.data[2] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn load_downmixes_stereo_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        // Two frames of (1000, 3000) average to 2000 per frame.
        write_wav(
            &dir.path().join("1_C4.wav"),
            &[1000, 3000, 1000, 3000],
            2,
        );
        let manifest = vec![(Note::C_4, "1_C4.wav".to_string())];
        let bank = SampleBank::load(dir.path(), &manifest).unwrap();
        let sample = bank.get(Note::C_4).unwrap();
        assert_eq!(sample.data.len(), 2);
        assert!((sample.data[0] - 2000.0 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = vec![(Note::C_4, "1_C4.wav".to_string())];
        let result = SampleBank::load(dir.path(), &manifest);
        assert!(result.is_err());
    }

    fn bank_with(notes: &[Note]) -> SampleBank {
        let mut bank = SampleBank::new();
        for &note in notes {
            bank.insert(
                note,
                Sample {
                    data: Arc::new(vec![0.0]),
                    sample_rate_hz: 44100,
                },
            );
        }
        bank
    }

    #[test]
    fn nearest_prefers_exact_match() {
        let bank = bank_with(&[Note::C_4, Note::D_4]);
        let (note, _) = bank.nearest(Note::D_4).unwrap();
        assert_eq!(note, Note::D_4);
    }

    #[test]
    fn nearest_resolves_unsampled_notes() {
        let bank = bank_with(&[Note::C_4, Note::E_4]);
        // C#4 is one semitone from C4 and three from E4.
        let (note, _) = bank.nearest(Note::C_SHARP_4).unwrap();
        assert_eq!(note, Note::C_4);
        // D4 is equidistant; ties go to the lower note.
        let (note, _) = bank.nearest(Note::D_4).unwrap();
        assert_eq!(note, Note::C_4);
    }

    #[test]
    fn nearest_on_an_empty_bank_is_none() {
        assert!(SampleBank::new().nearest(Note::C_4).is_none());
    }
}

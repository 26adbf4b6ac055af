//! 12-tone equal temperament notes following the MIDI numbering convention,
//! where C_4 is middle C. Notes identify the samples to play and are the keys
//! of the sample manifest, so they render and parse in the compact form used
//! by sample file names and the CLI: "C4", "C#5".
use std::{fmt::Display, str::FromStr};

pub const NOTES_PER_OCTAVE: u8 = 12;
const MAX_MIDI_INDEX: u8 = 127;

/// A note without an octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteName {
    relative_midi_index: u8,
}

impl NoteName {
    const fn from_index(relative_midi_index: u8) -> Self {
        assert!(relative_midi_index < NOTES_PER_OCTAVE);
        Self {
            relative_midi_index,
        }
    }

    pub const C: Self = Self::from_index(0);
    pub const C_SHARP: Self = Self::from_index(1);
    pub const D: Self = Self::from_index(2);
    pub const D_SHARP: Self = Self::from_index(3);
    pub const E: Self = Self::from_index(4);
    pub const F: Self = Self::from_index(5);
    pub const F_SHARP: Self = Self::from_index(6);
    pub const G: Self = Self::from_index(7);
    pub const G_SHARP: Self = Self::from_index(8);
    pub const A: Self = Self::from_index(9);
    pub const A_SHARP: Self = Self::from_index(10);
    pub const B: Self = Self::from_index(11);

    /// Returns a str representation of the note name where all accidentals
    /// are sharp, formatted like "C" or "C#"
    pub const fn to_str_sharp(self) -> &'static str {
        match self.relative_midi_index {
            0 => "C",
            1 => "C#",
            2 => "D",
            3 => "D#",
            4 => "E",
            5 => "F",
            6 => "F#",
            7 => "G",
            8 => "G#",
            9 => "A",
            10 => "A#",
            11 => "B",
            _ => unreachable!(),
        }
    }

    /// Parses a str like "C" or "C#"
    pub fn from_str_sharp(s: &str) -> Option<Self> {
        let relative_midi_index = match s {
            "C" => 0,
            "C#" => 1,
            "D" => 2,
            "D#" => 3,
            "E" => 4,
            "F" => 5,
            "F#" => 6,
            "G" => 7,
            "G#" => 8,
            "A" => 9,
            "A#" => 10,
            "B" => 11,
            _ => return None,
        };
        Some(Self {
            relative_midi_index,
        })
    }

    /// True for the note names that correspond to the black keys of a piano.
    pub const fn is_accidental(self) -> bool {
        matches!(self.relative_midi_index, 1 | 3 | 6 | 8 | 10)
    }
}

/// The ratio between the frequencies (and thus the playback rates) of two
/// notes the given number of semitones apart.
pub fn semitone_ratio(num_semitones: f32) -> f32 {
    2.0_f32.powf(num_semitones / (NOTES_PER_OCTAVE as f32))
}

/// Definition of notes based on MIDI note numbering. Octaves run from -1
/// (midi index 0) to 9, with C the first note of each octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi_index: u8,
}

impl Note {
    pub const fn new(name: NoteName, octave: i8) -> Self {
        let midi_index = (octave as i16 + 1) * NOTES_PER_OCTAVE as i16
            + name.relative_midi_index as i16;
        assert!(midi_index >= 0 && midi_index <= MAX_MIDI_INDEX as i16);
        Self {
            midi_index: midi_index as u8,
        }
    }

    pub const fn to_midi_index(self) -> u8 {
        self.midi_index
    }

    pub const fn octave(self) -> i8 {
        (self.midi_index / NOTES_PER_OCTAVE) as i8 - 1
    }

    pub const fn note_name(self) -> NoteName {
        NoteName::from_index(self.midi_index % NOTES_PER_OCTAVE)
    }

    pub const fn add_semitones(self, num_semitones: i16) -> Self {
        Self {
            midi_index: (self.midi_index as i16 + num_semitones) as u8,
        }
    }

    /// The signed number of semitones from `other` up to `self`.
    pub const fn semitones_from(self, other: Self) -> i16 {
        self.midi_index as i16 - other.midi_index as i16
    }
}

impl Note {
    pub const C_4: Self = Self::new(NoteName::C, 4);
    pub const C_SHARP_4: Self = Self::new(NoteName::C_SHARP, 4);
    pub const D_4: Self = Self::new(NoteName::D, 4);
    pub const D_SHARP_4: Self = Self::new(NoteName::D_SHARP, 4);
    pub const E_4: Self = Self::new(NoteName::E, 4);
    pub const F_4: Self = Self::new(NoteName::F, 4);
    pub const F_SHARP_4: Self = Self::new(NoteName::F_SHARP, 4);
    pub const G_4: Self = Self::new(NoteName::G, 4);
    pub const G_SHARP_4: Self = Self::new(NoteName::G_SHARP, 4);
    pub const A_4: Self = Self::new(NoteName::A, 4);
    pub const A_SHARP_4: Self = Self::new(NoteName::A_SHARP, 4);
    pub const B_4: Self = Self::new(NoteName::B, 4);
    pub const C_5: Self = Self::new(NoteName::C, 5);
    pub const C_SHARP_5: Self = Self::new(NoteName::C_SHARP, 5);
    pub const D_5: Self = Self::new(NoteName::D, 5);
    pub const D_SHARP_5: Self = Self::new(NoteName::D_SHARP, 5);
    pub const E_5: Self = Self::new(NoteName::E, 5);
    pub const F_5: Self = Self::new(NoteName::F, 5);
    pub const F_SHARP_5: Self = Self::new(NoteName::F_SHARP, 5);
    pub const G_5: Self = Self::new(NoteName::G, 5);
    pub const G_SHARP_5: Self = Self::new(NoteName::G_SHARP, 5);
    pub const A_5: Self = Self::new(NoteName::A, 5);
    pub const A_SHARP_5: Self = Self::new(NoteName::A_SHARP, 5);
    pub const B_5: Self = Self::new(NoteName::B, 5);
    pub const C_6: Self = Self::new(NoteName::C, 6);
}

/// Example formats: "C4", "C#5". Notes in octave "-1" are written like
/// "C-1" or "C#-1".
impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.note_name().to_str_sharp(), self.octave())
    }
}

/// Expected format: "C4", "C#5"
impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split after the note name on char boundaries so arbitrary input
        // (including multi-byte characters) parses as an error rather than
        // panicking on a byte slice.
        let mut indices = s.char_indices();
        if indices.next().is_none() {
            return Err(format!("Note string too short: {:?}", s));
        }
        let name_end = match indices.next() {
            Some((i, '#')) => i + '#'.len_utf8(),
            Some((i, _)) => i,
            None => return Err(format!("Note string too short: {:?}", s)),
        };
        let name = NoteName::from_str_sharp(&s[..name_end])
            .ok_or_else(|| format!("Failed to parse note name: {}", s))?;
        let octave = s[name_end..]
            .parse::<i8>()
            .map_err(|e| format!("Failed to parse octave: {}", e))?;
        let midi_index = (octave as i16 + 1) * NOTES_PER_OCTAVE as i16
            + name.relative_midi_index as i16;
        if midi_index < 0 || midi_index > MAX_MIDI_INDEX as i16 {
            return Err(format!("Octave index {} out of range.", octave));
        }
        Ok(Note::new(name, octave))
    }
}

//! The static keyboard configuration: the ordered set of playable notes with
//! their key bindings and colors, and the normalized on-screen geometry used
//! for both rendering and pointer hit-testing.
use crate::{
    key::{Key, KeyBinding},
    note::Note,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

/// One playable key: a note, the physical keys bound to it, and whether it
/// renders as a white or black key. Fixed at composition time.
#[derive(Debug, Clone)]
pub struct KeyDef {
    pub note: Note,
    pub binding: KeyBinding,
    pub color: KeyColor,
}

#[derive(Debug, Clone)]
pub struct Layout {
    keys: Vec<KeyDef>,
}

fn white(note: Note, binding: impl Into<KeyBinding>) -> KeyDef {
    KeyDef {
        note,
        binding: binding.into(),
        color: KeyColor::White,
    }
}

fn black(note: Note, key: Key) -> KeyDef {
    KeyDef {
        note,
        binding: KeyBinding::single(key),
        color: KeyColor::Black,
    }
}

impl Layout {
    pub fn new(keys: Vec<KeyDef>) -> Self {
        Self { keys }
    }

    /// The reference two-octave-and-a-note layout: C4 to C6 mapped onto the
    /// QWERTY row (white keys) with the number and home rows for the black
    /// keys. C5 is reachable from both "i" and "c".
    pub fn reference() -> Self {
        use Key::*;
        Self::new(vec![
            white(Note::C_4, Q),
            white(Note::D_4, W),
            white(Note::E_4, E),
            white(Note::F_4, R),
            white(Note::G_4, T),
            white(Note::A_4, Y),
            white(Note::B_4, U),
            white(Note::C_5, KeyBinding::of([I, C])),
            white(Note::D_5, V),
            white(Note::E_5, B),
            white(Note::F_5, N),
            white(Note::G_5, M),
            white(Note::A_5, Comma),
            white(Note::B_5, Period),
            white(Note::C_6, Slash),
            black(Note::C_SHARP_4, N2),
            black(Note::D_SHARP_4, N3),
            black(Note::F_SHARP_4, N5),
            black(Note::G_SHARP_4, N6),
            black(Note::A_SHARP_4, N7),
            black(Note::C_SHARP_5, F),
            black(Note::D_SHARP_5, G),
            black(Note::F_SHARP_5, J),
            black(Note::G_SHARP_5, K),
            black(Note::A_SHARP_5, L),
        ])
    }

    pub fn keys(&self) -> &[KeyDef] {
        &self.keys
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self)
    }
}

/// A key's rectangle in coordinates normalized to the keyboard area, where
/// (0, 0) is the top left and (1, 1) the bottom right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyRegion {
    pub x_01: f32,
    pub y_01: f32,
    pub width_01: f32,
    pub height_01: f32,
}

impl KeyRegion {
    pub fn contains(&self, x_01: f32, y_01: f32) -> bool {
        x_01 >= self.x_01
            && x_01 < self.x_01 + self.width_01
            && y_01 >= self.y_01
            && y_01 < self.y_01 + self.height_01
    }
}

const BLACK_KEY_WIDTH_RATIO: f32 = 0.6;
const BLACK_KEY_HEIGHT_RATIO: f32 = 0.6;

/// On-screen geometry for a layout. White keys split the keyboard width
/// evenly; each black key straddles the boundary above the white key
/// immediately below it in pitch. Regions are indexed in layout order.
#[derive(Debug, Clone)]
pub struct Geometry {
    regions: Vec<KeyRegion>,
    /// Key indices in hit-test order. Black keys are rendered on top of
    /// white keys so they must be tested first.
    hit_order: Vec<usize>,
}

impl Geometry {
    fn new(layout: &Layout) -> Self {
        let keys = layout.keys();
        let white_indices = keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.color == KeyColor::White)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let white_width = 1.0 / white_indices.len() as f32;
        let mut regions = vec![
            KeyRegion {
                x_01: 0.0,
                y_01: 0.0,
                width_01: 0.0,
                height_01: 0.0,
            };
            keys.len()
        ];
        for (position, &i) in white_indices.iter().enumerate() {
            regions[i] = KeyRegion {
                x_01: position as f32 * white_width,
                y_01: 0.0,
                width_01: white_width,
                height_01: 1.0,
            };
        }
        for (i, key) in keys.iter().enumerate() {
            if key.color != KeyColor::Black {
                continue;
            }
            // The white key closest below this black key in pitch. The black
            // key sits on the boundary between it and the next white key.
            let below = white_indices
                .iter()
                .enumerate()
                .filter(|&(_, &w)| keys[w].note < key.note)
                .max_by_key(|&(_, &w)| keys[w].note);
            let Some((position, _)) = below else {
                log::warn!(
                    "black key {} has no white key below it; not placed",
                    key.note
                );
                continue;
            };
            let width_01 = white_width * BLACK_KEY_WIDTH_RATIO;
            regions[i] = KeyRegion {
                x_01: (position as f32 + 1.0) * white_width - width_01 / 2.0,
                y_01: 0.0,
                width_01,
                height_01: BLACK_KEY_HEIGHT_RATIO,
            };
        }
        let mut hit_order = Vec::with_capacity(keys.len());
        hit_order.extend(
            keys.iter()
                .enumerate()
                .filter(|(_, key)| key.color == KeyColor::Black)
                .map(|(i, _)| i),
        );
        hit_order.extend(white_indices);
        Self { regions, hit_order }
    }

    pub fn region(&self, key_index: usize) -> KeyRegion {
        self.regions[key_index]
    }

    /// The index of the topmost key under the given point, if any.
    pub fn hit_test(&self, x_01: f32, y_01: f32) -> Option<usize> {
        self.hit_order
            .iter()
            .copied()
            .find(|&i| self.regions[i].contains(x_01, y_01))
    }
}

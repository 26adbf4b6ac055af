mod key;
mod layout;
mod note;
mod state;

pub use key::{Key, KeyBinding};
pub use layout::{Geometry, KeyColor, KeyDef, KeyRegion, Layout};
pub use note::{Note, NoteName, semitone_ratio};
pub use state::{AudioCommand, InputEvent, KeyboardState};

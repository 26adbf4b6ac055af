/// The singer above the keys opens their mouth while any note sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mouth {
    Closed,
    Open,
}

pub fn mouth(any_note_held: bool) -> Mouth {
    if any_note_held {
        Mouth::Open
    } else {
        Mouth::Closed
    }
}

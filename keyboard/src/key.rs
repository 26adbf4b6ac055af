use smallvec::{SmallVec, smallvec};

/// A physical input key that can be bound to a note. Identified by the
/// character it produces on a US layout, which is also the label printed on
/// the on-screen key cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    Comma,
    Period,
    Slash,
}

impl Key {
    pub const fn label(self) -> &'static str {
        use Key::*;
        match self {
            A => "a",
            B => "b",
            C => "c",
            D => "d",
            E => "e",
            F => "f",
            G => "g",
            H => "h",
            I => "i",
            J => "j",
            K => "k",
            L => "l",
            M => "m",
            N => "n",
            O => "o",
            P => "p",
            Q => "q",
            R => "r",
            S => "s",
            T => "t",
            U => "u",
            V => "v",
            W => "w",
            X => "x",
            Y => "y",
            Z => "z",
            N0 => "0",
            N1 => "1",
            N2 => "2",
            N3 => "3",
            N4 => "4",
            N5 => "5",
            N6 => "6",
            N7 => "7",
            N8 => "8",
            N9 => "9",
            Comma => ",",
            Period => ".",
            Slash => "/",
        }
    }
}

/// The set of physical keys bound to a single note. Almost always a single
/// key, so the set is backed by a small vector that doesn't allocate for the
/// common case. Matching is set containment; a single key is just a
/// one-element set.
#[derive(Debug, Clone)]
pub struct KeyBinding(SmallVec<[Key; 2]>);

impl KeyBinding {
    pub fn single(key: Key) -> Self {
        Self(smallvec![key])
    }

    pub fn of(keys: impl IntoIterator<Item = Key>) -> Self {
        Self(keys.into_iter().collect())
    }

    pub fn contains(&self, key: Key) -> bool {
        self.0.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.0.iter().copied()
    }

    /// The key cap label for this binding: the bound keys joined by "/" when
    /// more than one key maps to the note.
    pub fn label(&self) -> String {
        self.0
            .iter()
            .map(|key| key.label())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::single(key)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_key_label() {
        assert_eq!(KeyBinding::single(Key::Q).label(), "q");
    }

    #[test]
    fn multi_key_label_joined_with_slash() {
        assert_eq!(KeyBinding::of([Key::I, Key::C]).label(), "i/c");
    }

    #[test]
    fn containment_is_per_key() {
        let binding = KeyBinding::of([Key::I, Key::C]);
        assert!(binding.contains(Key::I));
        assert!(binding.contains(Key::C));
        assert!(!binding.contains(Key::J));
    }
}

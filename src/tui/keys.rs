/// Raw bytes the two input models agree on.
pub const ESC: u8 = 0x1b;
pub const CTRL_C: u8 = 0x03;
pub const CTRL_D: u8 = 0x04;
pub const CTRL_Z: u8 = 0x1a;
/// Prefixes of two-byte console scan codes.
pub const SCAN_PREFIXES: [u8; 2] = [0xe0, 0x00];

/// One logical keypress after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Select,
    Exit,
    Down,
    Up,
    Digit(u8),
    Unrecognized,
}

/// How the platform delivers keys to a blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModel {
    /// termios raw mode: arrows arrive as `ESC [ A` style 3-byte sequences.
    Posix,
    /// console getch: arrows arrive as a `0xE0`/`0x00` prefix plus a scan code.
    Console,
}

impl InputModel {
    pub fn native() -> Self {
        if cfg!(windows) {
            InputModel::Console
        } else {
            InputModel::Posix
        }
    }

    pub fn end_of_input_byte(self) -> u8 {
        match self {
            InputModel::Posix => CTRL_D,
            InputModel::Console => CTRL_Z,
        }
    }
}

/// Raw key representations for each navigation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub select: Vec<Vec<u8>>,
    pub exit: Vec<Vec<u8>>,
    pub down: Vec<Vec<u8>>,
    pub up: Vec<Vec<u8>>,
}

impl KeyBindings {
    pub fn for_model(model: InputModel) -> Self {
        let (down, up): (Vec<Vec<u8>>, Vec<Vec<u8>>) = match model {
            InputModel::Posix => (
                vec![b"\x1b[B".to_vec(), b"\x1bOB".to_vec()],
                vec![b"\x1b[A".to_vec(), b"\x1bOA".to_vec()],
            ),
            InputModel::Console => (
                SCAN_PREFIXES.iter().map(|p| vec![*p, b'P']).collect(),
                SCAN_PREFIXES.iter().map(|p| vec![*p, b'H']).collect(),
            ),
        };
        Self {
            select: vec![b"\n".to_vec(), b"\r".to_vec()],
            exit: vec![b"q".to_vec(), vec![ESC]],
            down: std::iter::once(b"j".to_vec()).chain(down).collect(),
            up: std::iter::once(b"k".to_vec()).chain(up).collect(),
        }
    }

    /// Map the bytes of one read to a key event. Bindings are checked before
    /// digits, so a binding can shadow a number key.
    pub fn classify(&self, raw: &[u8]) -> KeyEvent {
        let bound = |set: &[Vec<u8>]| set.iter().any(|k| k.as_slice() == raw);
        if bound(&self.select) {
            KeyEvent::Select
        } else if bound(&self.exit) {
            KeyEvent::Exit
        } else if bound(&self.down) {
            KeyEvent::Down
        } else if bound(&self.up) {
            KeyEvent::Up
        } else {
            match raw {
                [d] if d.is_ascii_digit() => KeyEvent::Digit(d - b'0'),
                _ => KeyEvent::Unrecognized,
            }
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::for_model(InputModel::native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_arrows_match_letter_shortcuts() {
        let kb = KeyBindings::for_model(InputModel::Posix);
        assert_eq!(kb.classify(b"\x1b[B"), KeyEvent::Down);
        assert_eq!(kb.classify(b"j"), KeyEvent::Down);
        assert_eq!(kb.classify(b"\x1b[A"), KeyEvent::Up);
        assert_eq!(kb.classify(b"k"), KeyEvent::Up);
        assert_eq!(kb.classify(&[0xe0, b'P']), KeyEvent::Unrecognized);
    }

    #[test]
    fn console_scan_codes_use_both_prefixes() {
        let kb = KeyBindings::for_model(InputModel::Console);
        assert_eq!(kb.classify(&[0xe0, b'P']), KeyEvent::Down);
        assert_eq!(kb.classify(&[0x00, b'P']), KeyEvent::Down);
        assert_eq!(kb.classify(&[0xe0, b'H']), KeyEvent::Up);
        assert_eq!(kb.classify(&[0x00, b'H']), KeyEvent::Up);
        assert_eq!(kb.classify(b"\x1b[B"), KeyEvent::Unrecognized);
    }

    #[test]
    fn select_exit_and_digits() {
        let kb = KeyBindings::for_model(InputModel::Posix);
        assert_eq!(kb.classify(b"\r"), KeyEvent::Select);
        assert_eq!(kb.classify(b"\n"), KeyEvent::Select);
        assert_eq!(kb.classify(b"q"), KeyEvent::Exit);
        assert_eq!(kb.classify(&[ESC]), KeyEvent::Exit);
        assert_eq!(kb.classify(b"7"), KeyEvent::Digit(7));
        assert_eq!(kb.classify(b"0"), KeyEvent::Digit(0));
        assert_eq!(kb.classify(b"x"), KeyEvent::Unrecognized);
        assert_eq!(kb.classify(b"\x1b[C"), KeyEvent::Unrecognized);
    }

    #[test]
    fn custom_binding_shadows_digit() {
        let mut kb = KeyBindings::for_model(InputModel::Posix);
        kb.exit.push(b"0".to_vec());
        assert_eq!(kb.classify(b"0"), KeyEvent::Exit);
    }
}

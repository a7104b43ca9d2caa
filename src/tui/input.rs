use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;
use tracing::trace;

use super::keys::{InputModel, CTRL_C, ESC, SCAN_PREFIXES};
use super::Cancel;
use crate::defaults::Defaults;
use crate::error::MenuError;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const UTF8_E0: u8 = SCAN_PREFIXES[0];

fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

// What `Terminal::finish_sequence` completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Navigation,
    Text,
}

/// Result of one blocking key read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keypress {
    /// Bytes of one key or escape sequence.
    Key(Vec<u8>),
    Cancelled(Cancel),
}

/// Byte-at-a-time input the decoder pulls from.
pub trait ByteSource {
    /// `Ok(None)` means the stream is closed.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;

    /// Whether another byte arrives within `wait`. Used to tell a lone ESC
    /// from the start of an arrow-key sequence.
    fn has_pending(&mut self, _wait: Duration) -> io::Result<bool> {
        Ok(true)
    }
}

impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
    fn has_pending(&mut self, _wait: Duration) -> io::Result<bool> {
        Ok(!self.is_empty())
    }
}

/// Unbuffered stdin, so `has_pending` sees exactly what the kernel holds.
pub struct StdinBytes;

impl ByteSource for StdinBytes {
    #[cfg(unix)]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut b = 0u8;
        loop {
            // SAFETY: reads at most one byte into a live stack variable.
            let n = unsafe { libc::read(libc::STDIN_FILENO, (&mut b as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(Some(b)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;
        let mut b = [0u8; 1];
        match io::stdin().read(&mut b)? {
            0 => Ok(None),
            _ => Ok(Some(b[0])),
        }
    }

    #[cfg(unix)]
    fn has_pending(&mut self, wait: Duration) -> io::Result<bool> {
        let mut fds = libc::pollfd { fd: libc::STDIN_FILENO, events: libc::POLLIN, revents: 0 };
        let timeout = wait.as_millis().min(i32::MAX as u128) as libc::c_int;
        loop {
            // SAFETY: one valid pollfd, count 1.
            let n = unsafe { libc::poll(&mut fds, 1, timeout) };
            if n >= 0 {
                return Ok(n > 0);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

/// Console key events re-encoded as the byte stream `getch` would return.
#[derive(Default)]
pub struct ConsoleBytes {
    pending: VecDeque<u8>,
}

impl ByteSource for ConsoleBytes {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        while self.pending.is_empty() {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Release {
                    self.pending.extend(encode_console_key(k));
                }
            }
        }
        Ok(self.pending.pop_front())
    }

    fn has_pending(&mut self, _wait: Duration) -> io::Result<bool> {
        Ok(!self.pending.is_empty())
    }
}

pub fn encode_console_key(k: event::KeyEvent) -> Vec<u8> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    let scan = |code: u8| vec![SCAN_PREFIXES[0], code];
    match k.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => vec![CTRL_C],
        KeyCode::Char('z') | KeyCode::Char('Z') if ctrl => vec![InputModel::Console.end_of_input_byte()],
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).as_bytes().to_vec()
        }
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Esc => vec![ESC],
        KeyCode::Backspace => vec![BACKSPACE],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::Up => scan(b'H'),
        KeyCode::Down => scan(b'P'),
        KeyCode::Left => scan(b'K'),
        KeyCode::Right => scan(b'M'),
        KeyCode::Home => scan(b'G'),
        KeyCode::End => scan(b'O'),
        KeyCode::Delete => scan(b'S'),
        _ => Vec::new(),
    }
}

/// Enables raw mode and restores the previous mode on drop, including
/// early returns through `?`.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking key and line reader over one input model.
pub struct Terminal {
    bytes: Box<dyn ByteSource>,
    model: InputModel,
    raw_mode: bool,
    esc_wait: Duration,
}

impl Terminal {
    pub fn new(bytes: Box<dyn ByteSource>, model: InputModel) -> Self {
        Self {
            bytes,
            model,
            raw_mode: true,
            esc_wait: Duration::from_millis(Defaults::ESC_SEQUENCE_WAIT_MS),
        }
    }

    /// The process's own terminal, using the platform's input model.
    pub fn stdin() -> Self {
        match InputModel::native() {
            InputModel::Posix => Self::new(Box::new(StdinBytes), InputModel::Posix),
            InputModel::Console => Self::new(Box::<ConsoleBytes>::default(), InputModel::Console),
        }
    }

    /// Fixed input, no terminal mode changes.
    pub fn scripted(bytes: &[u8], model: InputModel) -> Self {
        let mut t = Self::new(Box::new(bytes.iter().copied().collect::<VecDeque<u8>>()), model);
        t.raw_mode = false;
        t
    }

    pub fn model(&self) -> InputModel {
        self.model
    }

    fn raw(&self) -> io::Result<Option<RawModeGuard>> {
        if self.raw_mode {
            RawModeGuard::enable().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Block until one key (or escape sequence) is available.
    pub fn read_key(&mut self) -> io::Result<Keypress> {
        let _raw = self.raw()?;
        let Some(first) = self.bytes.next_byte()? else {
            return Ok(Keypress::Cancelled(Cancel::EndOfInput));
        };
        if first == CTRL_C {
            return Ok(Keypress::Cancelled(Cancel::Interrupt));
        }
        if first == self.model.end_of_input_byte() {
            return Ok(Keypress::Cancelled(Cancel::EndOfInput));
        }
        let mut key = vec![first];
        self.finish_sequence(&mut key)?;
        trace!(?key, "key read");
        Ok(Keypress::Key(key))
    }

    // Pull the remaining bytes of an arrow-key sequence started by key[0].
    // On the console model a 0xE0 lead followed by a UTF-8 continuation byte
    // is a character (U+0800..U+0FFF), not a scan code; its last byte is read
    // too and the result is `Sequence::Text`.
    fn finish_sequence(&mut self, key: &mut Vec<u8>) -> io::Result<Sequence> {
        match self.model {
            InputModel::Posix if key[0] == ESC => {
                if !self.bytes.has_pending(self.esc_wait)? {
                    return Ok(Sequence::Navigation);
                }
                if let Some(second) = self.bytes.next_byte()? {
                    key.push(second);
                    if matches!(second, b'[' | b'O') {
                        if let Some(third) = self.bytes.next_byte()? {
                            key.push(third);
                        }
                    }
                }
            }
            InputModel::Console if SCAN_PREFIXES.contains(&key[0]) => {
                if let Some(code) = self.bytes.next_byte()? {
                    key.push(code);
                    if key[0] == UTF8_E0 && is_continuation(code) {
                        if let Some(last) = self.bytes.next_byte()? {
                            key.push(last);
                        }
                        return Ok(Sequence::Text);
                    }
                }
            }
            _ => {}
        }
        Ok(Sequence::Navigation)
    }

    /// Read one line, echoing what is typed to `echo`.
    ///
    /// Ctrl+C cancels with `Interrupt`; the end-of-input key on an empty line,
    /// or a closed stream before anything was typed, cancels with `EndOfInput`.
    pub fn read_line(&mut self, echo: &mut dyn Write) -> Result<String, MenuError> {
        let _raw = self.raw()?;
        let eof = self.model.end_of_input_byte();
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let Some(b) = self.bytes.next_byte()? else {
                if buf.is_empty() {
                    return Err(Cancel::EndOfInput.into());
                }
                break;
            };
            match b {
                CTRL_C => return Err(Cancel::Interrupt.into()),
                b'\r' | b'\n' => break,
                b if b == eof => {
                    if buf.is_empty() {
                        return Err(Cancel::EndOfInput.into());
                    }
                }
                BACKSPACE | DELETE => {
                    if pop_char(&mut buf) {
                        echo.write_all(b"\x08 \x08")?;
                        echo.flush()?;
                    }
                }
                b if b == ESC || (self.model == InputModel::Console && SCAN_PREFIXES.contains(&b)) => {
                    let mut seq = vec![b];
                    if self.finish_sequence(&mut seq)? == Sequence::Text {
                        buf.extend_from_slice(&seq);
                        echo.write_all(&seq)?;
                        echo.flush()?;
                    }
                }
                b if b < 0x20 => {}
                b => {
                    buf.push(b);
                    echo.write_all(&[b])?;
                    echo.flush()?;
                }
            }
        }
        echo.write_all(b"\r\n")?;
        echo.flush()?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

// Drop the last UTF-8 character. False when there was nothing to drop.
fn pop_char(buf: &mut Vec<u8>) -> bool {
    let Some(mut last) = buf.pop() else {
        return false;
    };
    while is_continuation(last) {
        match buf.pop() {
            Some(b) => last = b,
            None => break,
        }
    }
    true
}

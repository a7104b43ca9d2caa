#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use gpu_catalog::tui::{Console, InputModel, Terminal};

/// Output sink that stays readable after the console takes ownership of it.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A console reading `script` with POSIX key encoding and no pauses.
pub fn console(script: &[u8]) -> (Console, Capture) {
    let out = Capture::default();
    let console = Console::new(Terminal::scripted(script, InputModel::Posix), Box::new(out.clone()))
        .with_pause(Duration::ZERO);
    (console, out)
}

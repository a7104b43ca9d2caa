//! Console menu engine: raw key input, full-repaint rendering, the menu
//! session loop, guarded blocks and registration prompts.

use thiserror::Error;

pub mod guard;
pub mod input;
pub mod keys;
pub mod prompt;
pub mod render;
pub mod session;

pub use guard::{guarded, CANCELLATIONS};
pub use input::{Keypress, Terminal};
pub use keys::{InputModel, KeyBindings, KeyEvent};
pub use prompt::{Param, ParamKind, RegistrationForm, WriteOp};
pub use session::{Console, Handler, MenuArgs, MenuOption, MenuState, Selected, SessionResult, Transition};

/// The two ways a user can abandon whatever the terminal is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancel {
    /// Ctrl+C
    #[error("Interrupt")]
    Interrupt,
    /// Input stream closed, Ctrl+D (POSIX) or Ctrl+Z (console)
    #[error("EndOfInput")]
    EndOfInput,
}

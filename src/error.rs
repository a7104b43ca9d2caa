use std::io;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::tui::Cancel;

/// Everything a menu handler or prompt can end with.
///
/// `Cancelled` is control flow: the session loop and `tui::guard::guarded`
/// turn it back into "return to the menu I came from". The other variants are
/// real failures and travel up to the host.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("{0}")]
    Cancelled(Cancel),

    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl MenuError {
    pub fn cancel(&self) -> Option<Cancel> {
        match self {
            MenuError::Cancelled(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<Cancel> for MenuError {
    fn from(c: Cancel) -> Self {
        MenuError::Cancelled(c)
    }
}

/// Wiring mistakes in a registration form. Raised when the form is built,
/// never while the user is typing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("registration target {target} cannot take variadic parameter {param}")]
    Variadic { target: String, param: String },

    #[error("registration target {target} takes its connection parameter {param} at position {position}; it must come first")]
    MisplacedConnection { target: String, param: String, position: usize },
}

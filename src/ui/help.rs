use std::path::Path;

use crate::defaults::Defaults;

/// Shown under a menu that has no footer of its own.
pub fn help_menu() -> &'static str {
    Defaults::FOOTER
}

/// Shown under a printed report.
pub fn help_report() -> &'static str {
    "Press any key to return"
}

pub fn help_register(display: &str) -> String {
    format!("Registering a new {}. Ctrl+C or Ctrl+D to cancel.", display.to_lowercase())
}

/// Told to the user when a missing catalog file was created with sample data.
pub fn help_seeded(path: &Path) -> String {
    format!("Database \"{}\" does not exist, setting up a new one with sample data!", path.display())
}

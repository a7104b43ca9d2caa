use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

use crate::catalog::Catalog;
use crate::screens::main_menu;
use crate::tui::{Console, Selected};
use crate::ui::help::help_seeded;

/// Run the main menu on `console` until it returns an exit code.
pub fn run(console: &mut Console, catalog: Catalog) -> Result<i32> {
    let menu = main_menu(Rc::new(RefCell::new(catalog))).context("building main menu")?;
    let code = match console.run(menu)? {
        Some(Selected { value: Some(code), .. }) => code,
        _ => 0,
    };
    info!(code, "menu finished");
    Ok(code)
}

/// Interactive session on the process's own terminal.
pub fn run_menu(db: &Path, pause: Duration) -> Result<i32> {
    let (catalog, created) = Catalog::open_or_seed(db).with_context(|| format!("opening {}", db.display()))?;
    if created {
        println!("{}", help_seeded(db));
    }
    let mut console = Console::stdio().with_pause(pause);
    run(&mut console, catalog)
}

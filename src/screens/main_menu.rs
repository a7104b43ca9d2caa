use super::{browse, listing, register, SharedCatalog};
use crate::error::FormError;
use crate::tui::{Console, MenuArgs, MenuOption, Transition};

pub const TITLE: &str = "GPU Catalog";
pub const EXIT: usize = 4;

/// Top-level menu. The run ends with the exit code `Exit` returns; q, Esc
/// and cancellation land there too.
pub fn main_menu(catalog: SharedCatalog) -> Result<MenuArgs<i32>, FormError> {
    let options = vec![
        MenuOption::with_handler("List all GPUs", listing::list_all(catalog.clone())),
        MenuOption::with_handler("Browse by manufacturer", browse::by_manufacturer(catalog.clone())),
        MenuOption::with_handler("Browse by architecture", browse::by_architecture(catalog.clone())),
        MenuOption::with_handler("Register", register::register_menu(catalog)?),
        MenuOption::new("Exit", |_: &mut Console, _: usize, _: &str, _: &MenuArgs<i32>| Ok(Transition::Return(0))),
    ];
    Ok(MenuArgs::new(TITLE, options).default_choice(Some(EXIT)))
}

//! The catalog's menus, built on the `tui` engine.

use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::tui::{Console, MenuArgs, MenuOption, Transition};

pub mod browse;
pub mod listing;
pub mod main_menu;
pub mod register;

pub use main_menu::main_menu;

/// The catalog as shared by every menu handler.
pub type SharedCatalog = Rc<RefCell<Catalog>>;

/// Last entry of a submenu: show `parent` again with option `index` highlighted.
pub fn back<T: 'static>(parent: &MenuArgs<T>, index: usize) -> MenuOption<T> {
    let parent = parent.clone();
    MenuOption::new("Back", move |_: &mut Console, _: usize, _: &str, _: &MenuArgs<T>| {
        Ok(Transition::Replace(parent.clone().initial(index)))
    })
}

/// A submenu whose exit keys go back to `parent`.
pub fn submenu<T: 'static>(
    title: &str,
    mut options: Vec<MenuOption<T>>,
    parent: &MenuArgs<T>,
    index: usize,
) -> MenuArgs<T> {
    options.push(back(parent, index));
    let back_index = options.len() - 1;
    MenuArgs::new(title, options).default_choice(Some(back_index))
}

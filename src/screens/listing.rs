use std::io::Write;
use std::rc::Rc;

use super::SharedCatalog;
use crate::catalog::{format_table, Catalog, Select, TableStyle, View};
use crate::error::MenuError;
use crate::tui::{guarded, Console, Handler, MenuArgs, Transition, CANCELLATIONS};
use crate::ui::help::help_report;

/// Every GPU with its details, in registration order.
pub fn all_gpus() -> Select {
    Select::new(View::GpuDetails).order_by("GPU.id", true)
}

pub fn show_all(console: &mut Console, catalog: &Catalog) -> Result<(), MenuError> {
    console.clear()?;
    let rows = catalog.select(&all_gpus())?;
    if rows.is_empty() {
        writeln!(console.out(), "No GPUs registered")?;
    } else {
        write!(console.out(), "{}", format_table(&rows, &TableStyle::default()))?;
    }
    console.wait_for_key(help_report())
}

/// "List all GPUs": print the table, wait for a key, show the menu again.
pub fn list_all<T: 'static>(catalog: SharedCatalog) -> Handler<T> {
    Rc::new(move |console: &mut Console, _: usize, _: &str, _: &MenuArgs<T>| {
        guarded(console, CANCELLATIONS, |c| show_all(c, &catalog.borrow()), |_| Transition::Stay)
    })
}

//! "Browse by ..." submenus: one entry per manufacturer or architecture,
//! each showing its details and the GPUs that reference it.

use std::io::Write;
use std::rc::Rc;

use super::{submenu, SharedCatalog};
use crate::catalog::{format_table, Catalog, Op, Select, TableStyle, View};
use crate::error::MenuError;
use crate::tui::{guarded, Console, Handler, MenuArgs, MenuOption, Transition, CANCELLATIONS};
use crate::ui::help::help_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Manufacturer(i64),
    Architecture(i64),
}

impl Subject {
    fn key(self) -> (View, &'static str, i64) {
        match self {
            Subject::Manufacturer(id) => (View::ManufacturerInfo, "Manufacturer.manufacturer_id", id),
            Subject::Architecture(id) => (View::ArchitectureInfo, "Architecture.arch_id", id),
        }
    }

    pub fn info(self) -> Select {
        let (view, column, id) = self.key();
        Select::new(view).filter(column, Op::Eq, id)
    }

    pub fn gpus(self) -> Select {
        let (_, column, id) = self.key();
        Select::new(View::GpuDetails).filter(column, Op::Eq, id).order_by("GPU.id", true)
    }
}

pub fn show(console: &mut Console, catalog: &Catalog, subject: Subject) -> Result<(), MenuError> {
    console.clear()?;
    let info = catalog.select(&subject.info())?;
    for (name, value) in info.first_record().unwrap_or_default() {
        writeln!(console.out(), "{}: {}", name.replace('_', " "), value)?;
    }
    writeln!(console.out())?;
    let gpus = catalog.select(&subject.gpus())?;
    if gpus.is_empty() {
        writeln!(console.out(), "No GPUs registered")?;
    } else {
        write!(console.out(), "{}", format_table(&gpus, &TableStyle::default()))?;
    }
    console.wait_for_key(help_report())
}

fn details<T: 'static>(label: &str, catalog: SharedCatalog, subject: Subject) -> MenuOption<T> {
    MenuOption::new(label, move |console: &mut Console, _: usize, _: &str, _: &MenuArgs<T>| {
        guarded(console, CANCELLATIONS, |c| show(c, &catalog.borrow(), subject), |_| Transition::Stay)
    })
}

/// Submenu of manufacturers, rebuilt from the catalog each time it is opened.
pub fn by_manufacturer<T: 'static>(catalog: SharedCatalog) -> Handler<T> {
    Rc::new(move |_: &mut Console, index: usize, _: &str, parent: &MenuArgs<T>| {
        let options = catalog
            .borrow()
            .tables()
            .manufacturers
            .iter()
            .map(|m| details(&m.manufacturer_name, catalog.clone(), Subject::Manufacturer(m.manufacturer_id)))
            .collect();
        Ok(Transition::Replace(submenu("Manufacturers", options, parent, index)))
    })
}

pub fn by_architecture<T: 'static>(catalog: SharedCatalog) -> Handler<T> {
    Rc::new(move |_: &mut Console, index: usize, _: &str, parent: &MenuArgs<T>| {
        let options = catalog
            .borrow()
            .tables()
            .architectures
            .iter()
            .map(|a| details(&a.arch_name, catalog.clone(), Subject::Architecture(a.arch_id)))
            .collect();
        Ok(Transition::Replace(submenu("Architectures", options, parent, index)))
    })
}

use std::rc::Rc;

use super::{submenu, SharedCatalog};
use crate::catalog::{Catalog, CatalogError};
use crate::error::FormError;
use crate::tui::{Console, Handler, MenuArgs, MenuOption, Param, RegistrationForm, Transition, WriteOp};
use crate::util::current_year;

/// Every catalog write, with the name it is shown under.
pub fn write_ops() -> Vec<(&'static str, WriteOp<Catalog>)> {
    vec![
        (
            "Architecture",
            WriteOp::new(
                "register_architecture",
                vec![Param::connection("catalog"), Param::text("name")],
                |c: &mut Catalog, a| Ok(c.register_architecture(a.text(0)?)?),
            ),
        ),
        (
            "Processor",
            WriteOp::new(
                "register_processor",
                vec![Param::connection("catalog"), Param::text("name"), Param::int("arch_id")],
                |c: &mut Catalog, a| Ok(c.register_processor(a.text(0)?, a.int(1)?)?),
            ),
        ),
        (
            "Series",
            WriteOp::new(
                "register_series",
                vec![Param::connection("catalog"), Param::text("name"), Param::int_or("release_year", current_year())],
                |c: &mut Catalog, a| Ok(c.register_series(a.text(0)?, a.int(1)?)?),
            ),
        ),
        (
            "Manufacturer",
            WriteOp::new(
                "register_manufacturer",
                vec![Param::connection("catalog"), Param::text("name"), Param::int("founded_year")],
                |c: &mut Catalog, a| Ok(c.register_manufacturer(a.text(0)?, a.int(1)?)?),
            ),
        ),
        (
            "GPU",
            WriteOp::new(
                "register_gpu",
                vec![
                    Param::connection("catalog"),
                    Param::text("name"),
                    Param::int("processor_id"),
                    Param::int("clock_speed_mhz"),
                    Param::int("series_id"),
                    Param::int("manufacturer_id"),
                    Param::int("vram_size_gb"),
                    Param::int("price_cents"),
                ],
                |c: &mut Catalog, a| {
                    Ok(c.register_gpu(a.text(0)?, a.int(1)?, a.int(2)?, a.int(3)?, a.int(4)?, a.int(5)?, a.int(6)?)?)
                },
            ),
        ),
    ]
}

/// A write that names a record which does not exist. The user gets the
/// message and the menu back; other failures still end the run.
pub fn is_rejection(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<CatalogError>(), Some(CatalogError::UnknownReference { .. }))
}

/// The "Register" submenu. Forms are checked here, once, so a bad parameter
/// list fails at startup instead of when the entry is picked.
pub fn register_menu<T: 'static>(catalog: SharedCatalog) -> Result<Handler<T>, FormError> {
    let forms = write_ops()
        .into_iter()
        .map(|(display, op)| {
            let form = RegistrationForm::new(display, op, catalog.clone())?
                .report_rejections(is_rejection);
            Ok((display, form.into_handler::<T>()))
        })
        .collect::<Result<Vec<_>, FormError>>()?;

    Ok(Rc::new(move |_: &mut Console, index: usize, _: &str, parent: &MenuArgs<T>| {
        let options = forms.iter().map(|(label, h)| MenuOption::with_handler(*label, h.clone())).collect();
        Ok(Transition::Replace(submenu("Register", options, parent, index)))
    }))
}

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::catalog::{format_table, Catalog, Select, TableStyle, View};

/// What `list` prints, and whether the catalog had to be created first.
pub struct Listing {
    pub table: String,
    pub seeded: bool,
}

/// The GPU table, sorted by `order_by` (registration order when unset).
/// `with_ids` adds the id of every referenced record, for use in the
/// registration forms.
pub fn list(db: &Path, order_by: Option<&str>, desc: bool, with_ids: bool) -> Result<Listing> {
    let (catalog, seeded) = Catalog::open_or_seed(db).with_context(|| format!("opening {}", db.display()))?;
    let view = if with_ids { View::GpuDetailsWithIds } else { View::GpuDetails };
    let select = Select::new(view).order_by(order_by.unwrap_or("GPU.id"), !desc);
    debug!(query = %select, "listing");
    let rows = catalog.select(&select).context("querying GPUs")?;
    Ok(Listing { table: format_table(&rows, &TableStyle::default()), seeded })
}

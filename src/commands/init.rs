use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::catalog::Catalog;

/// Write a fresh catalog with the sample records. Returns the sample GPU's id.
pub fn init(db: &Path, force: bool) -> Result<i64> {
    if db.exists() && !force {
        bail!("{} already exists; pass --force to replace it", db.display());
    }
    let mut catalog = Catalog::create(db).with_context(|| format!("creating {}", db.display()))?;
    catalog.seed().context("writing sample data")
}

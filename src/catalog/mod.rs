//! GPU catalog store: five tables kept in memory and saved as JSON after
//! every write.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::defaults::Defaults;
use crate::types::{Architecture, Gpu, Manufacturer, Processor, Series};

pub mod query;
pub mod table;

pub use query::{Op, Rows, Select, View};
pub use table::{format_table, Align, TableStyle};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no {table} with id {id}")]
    UnknownReference { table: &'static str, id: i64 },

    #[error("no column {column} in {view}")]
    UnknownColumn { column: String, view: &'static str },

    #[error("reading {}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("writing {}", path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("parsing {}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("encoding catalog")]
    Encode(#[from] serde_json::Error),
}

/// Everything that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    pub architectures: Vec<Architecture>,
    pub processors: Vec<Processor>,
    pub manufacturers: Vec<Manufacturer>,
    pub series: Vec<Series>,
    pub gpus: Vec<Gpu>,
}

#[derive(Debug, Default)]
pub struct Catalog {
    path: Option<PathBuf>,
    tables: Tables,
}

// Next id after the largest one handed out so far.
fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl Catalog {
    /// A catalog that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read { path: path.into(), source })?;
        let tables = serde_json::from_str(&text).map_err(|source| CatalogError::Parse { path: path.into(), source })?;
        debug!(path = %path.display(), "catalog opened");
        Ok(Self { path: Some(path.into()), tables })
    }

    /// A new, empty catalog file at `path`.
    pub fn create(path: &Path) -> Result<Self, CatalogError> {
        let catalog = Self { path: Some(path.into()), tables: Tables::default() };
        catalog.save()?;
        Ok(catalog)
    }

    /// Open `path`, or create it with the sample records. The flag is true
    /// when the file was created; telling the user is up to the caller.
    pub fn open_or_seed(path: &Path) -> Result<(Self, bool), CatalogError> {
        if path.exists() {
            return Ok((Self::open(path)?, false));
        }
        info!(path = %path.display(), "catalog missing, seeding sample data");
        let mut catalog = Self::create(path)?;
        catalog.seed()?;
        Ok((catalog, true))
    }

    /// Register one record in every table, chained by id.
    pub fn seed(&mut self) -> Result<i64, CatalogError> {
        let aid = self.register_architecture(Defaults::SEED_ARCHITECTURE)?;
        let pid = self.register_processor(Defaults::SEED_PROCESSOR, aid)?;
        let sid = self.register_series(Defaults::SEED_SERIES, Defaults::SEED_SERIES_YEAR)?;
        let mid = self.register_manufacturer(Defaults::SEED_MANUFACTURER, Defaults::SEED_MANUFACTURER_FOUNDED)?;
        self.register_gpu(
            Defaults::SEED_GPU,
            pid,
            Defaults::SEED_GPU_CLOCK_MHZ,
            sid,
            mid,
            Defaults::SEED_GPU_VRAM_GB,
            Defaults::SEED_GPU_PRICE_CENTS,
        )
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn select(&self, select: &Select) -> Result<Rows, CatalogError> {
        select.run(&self.tables)
    }

    fn save(&self) -> Result<(), CatalogError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CatalogError::Write { path: path.clone(), source })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.tables)?;
        fs::write(path, json).map_err(|source| CatalogError::Write { path: path.clone(), source })
    }

    fn check(found: bool, table: &'static str, id: i64) -> Result<(), CatalogError> {
        if found {
            Ok(())
        } else {
            Err(CatalogError::UnknownReference { table, id })
        }
    }

    pub fn register_architecture(&mut self, name: &str) -> Result<i64, CatalogError> {
        let arch_id = next_id(self.tables.architectures.iter().map(|a| a.arch_id));
        self.tables.architectures.push(Architecture { arch_id, arch_name: name.into() });
        self.save()?;
        info!(arch_id, name, "architecture registered");
        Ok(arch_id)
    }

    pub fn register_processor(&mut self, name: &str, arch_id: i64) -> Result<i64, CatalogError> {
        Self::check(self.tables.architectures.iter().any(|a| a.arch_id == arch_id), "architecture", arch_id)?;
        let proc_id = next_id(self.tables.processors.iter().map(|p| p.proc_id));
        self.tables.processors.push(Processor { proc_id, proc_name: name.into(), arch_id });
        self.save()?;
        info!(proc_id, name, "processor registered");
        Ok(proc_id)
    }

    pub fn register_series(&mut self, name: &str, release_year: i64) -> Result<i64, CatalogError> {
        let series_id = next_id(self.tables.series.iter().map(|s| s.series_id));
        self.tables.series.push(Series { series_id, series_name: name.into(), release_year });
        self.save()?;
        info!(series_id, name, "series registered");
        Ok(series_id)
    }

    pub fn register_manufacturer(&mut self, name: &str, founded_year: i64) -> Result<i64, CatalogError> {
        let manufacturer_id = next_id(self.tables.manufacturers.iter().map(|m| m.manufacturer_id));
        self.tables.manufacturers.push(Manufacturer { manufacturer_id, manufacturer_name: name.into(), founded_year });
        self.save()?;
        info!(manufacturer_id, name, "manufacturer registered");
        Ok(manufacturer_id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn register_gpu(
        &mut self,
        name: &str,
        proc_id: i64,
        clock_speed_mhz: i64,
        series_id: i64,
        manufacturer_id: i64,
        vram_size_gb: i64,
        price_cents: i64,
    ) -> Result<i64, CatalogError> {
        let t = &self.tables;
        Self::check(t.processors.iter().any(|p| p.proc_id == proc_id), "processor", proc_id)?;
        Self::check(t.series.iter().any(|s| s.series_id == series_id), "series", series_id)?;
        Self::check(
            t.manufacturers.iter().any(|m| m.manufacturer_id == manufacturer_id),
            "manufacturer",
            manufacturer_id,
        )?;
        let id = next_id(t.gpus.iter().map(|g| g.id));
        self.tables.gpus.push(Gpu {
            id,
            name: name.into(),
            proc_id,
            clock_speed_mhz,
            series_id,
            manufacturer_id,
            vram_size_gb,
            price_cents,
        });
        self.save()?;
        info!(id, name, "gpu registered");
        Ok(id)
    }
}

use std::cmp::Ordering;
use std::fmt;

use super::{CatalogError, Tables};
use crate::types::Value;

/// Comparison used in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
        }
    }

    fn holds(self, ord: Ordering) -> bool {
        match self {
            Op::Eq => ord == Ordering::Equal,
            Op::Ne => ord != Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Ge => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Le => ord != Ordering::Greater,
        }
    }
}

const GPU_JOIN: &[&str] = &[
    "GPU.id",
    "GPU.name",
    "GPU.proc_id",
    "GPU.clock_speed_mhz",
    "GPU.series_id",
    "GPU.manufacturer_id",
    "GPU.vram_size_gb",
    "GPU.price_cents",
    "Processor.proc_id",
    "Processor.proc_name",
    "Processor.arch_id",
    "Architecture.arch_id",
    "Architecture.arch_name",
    "Series.series_id",
    "Series.series_name",
    "Series.release_year",
    "Manufacturer.manufacturer_id",
    "Manufacturer.manufacturer_name",
    "Manufacturer.founded_year",
];

/// The joined or single-table record sets a query can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every GPU with its processor, architecture, series and manufacturer.
    GpuDetails,
    /// Same join, ids included.
    GpuDetailsWithIds,
    ManufacturerInfo,
    ArchitectureInfo,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::GpuDetails => "gpu details",
            View::GpuDetailsWithIds => "gpu details with ids",
            View::ManufacturerInfo => "Manufacturer",
            View::ArchitectureInfo => "Architecture",
        }
    }

    /// Qualified columns available to filters and ordering.
    fn fields(self) -> &'static [&'static str] {
        match self {
            View::GpuDetails | View::GpuDetailsWithIds => GPU_JOIN,
            View::ManufacturerInfo => {
                &["Manufacturer.manufacturer_id", "Manufacturer.manufacturer_name", "Manufacturer.founded_year"]
            }
            View::ArchitectureInfo => &["Architecture.arch_id", "Architecture.arch_name"],
        }
    }

    /// Qualified columns that make up the result.
    fn projection(self) -> &'static [&'static str] {
        match self {
            View::GpuDetails => &[
                "GPU.name",
                "Processor.proc_name",
                "Architecture.arch_name",
                "GPU.clock_speed_mhz",
                "Series.series_name",
                "Series.release_year",
                "Manufacturer.manufacturer_name",
                "Manufacturer.founded_year",
                "GPU.vram_size_gb",
                "GPU.price_cents",
            ],
            View::GpuDetailsWithIds => &[
                "GPU.id",
                "GPU.name",
                "Processor.proc_id",
                "Processor.proc_name",
                "Architecture.arch_id",
                "Architecture.arch_name",
                "GPU.clock_speed_mhz",
                "Series.series_id",
                "Series.series_name",
                "Series.release_year",
                "Manufacturer.manufacturer_id",
                "Manufacturer.manufacturer_name",
                "Manufacturer.founded_year",
                "GPU.vram_size_gb",
                "GPU.price_cents",
            ],
            View::ManufacturerInfo => &["Manufacturer.manufacturer_name", "Manufacturer.founded_year"],
            View::ArchitectureInfo => &["Architecture.arch_name"],
        }
    }

    /// Index into `fields()` for a qualified (`GPU.id`) or bare (`id`) name.
    /// A bare name takes the first table that has it.
    fn resolve(self, column: &str) -> Result<usize, CatalogError> {
        let fields = self.fields();
        fields
            .iter()
            .position(|f| *f == column)
            .or_else(|| fields.iter().position(|f| f.rsplit('.').next() == Some(column)))
            .ok_or_else(|| CatalogError::UnknownColumn { column: column.to_string(), view: self.name() })
    }

    // One row per record, laid out as `fields()`. GPU rows are an inner join:
    // a GPU with a dangling reference is left out.
    fn load(self, t: &Tables) -> Vec<Vec<Value>> {
        match self {
            View::GpuDetails | View::GpuDetailsWithIds => t
                .gpus
                .iter()
                .filter_map(|g| {
                    let p = t.processors.iter().find(|p| p.proc_id == g.proc_id)?;
                    let a = t.architectures.iter().find(|a| a.arch_id == p.arch_id)?;
                    let s = t.series.iter().find(|s| s.series_id == g.series_id)?;
                    let m = t.manufacturers.iter().find(|m| m.manufacturer_id == g.manufacturer_id)?;
                    let row: Vec<Value> = vec![
                        g.id.into(),
                        g.name.as_str().into(),
                        g.proc_id.into(),
                        g.clock_speed_mhz.into(),
                        g.series_id.into(),
                        g.manufacturer_id.into(),
                        g.vram_size_gb.into(),
                        g.price_cents.into(),
                        p.proc_id.into(),
                        p.proc_name.as_str().into(),
                        p.arch_id.into(),
                        a.arch_id.into(),
                        a.arch_name.as_str().into(),
                        s.series_id.into(),
                        s.series_name.as_str().into(),
                        s.release_year.into(),
                        m.manufacturer_id.into(),
                        m.manufacturer_name.as_str().into(),
                        m.founded_year.into(),
                    ];
                    Some(row)
                })
                .collect(),
            View::ManufacturerInfo => t
                .manufacturers
                .iter()
                .map(|m| -> Vec<Value> {
                    vec![m.manufacturer_id.into(), m.manufacturer_name.as_str().into(), m.founded_year.into()]
                })
                .collect(),
            View::ArchitectureInfo => {
                t.architectures.iter().map(|a| -> Vec<Value> { vec![a.arch_id.into(), a.arch_name.as_str().into()] }).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filter {
    column: String,
    op: Op,
    value: Value,
}

/// A query over one view. Builder methods take and return the query by
/// value, so a shared base query can be cloned and narrowed freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    view: View,
    filters: Vec<Filter>,
    order: Vec<(String, bool)>,
}

impl Select {
    pub fn new(view: View) -> Self {
        Self { view, filters: Vec::new(), order: Vec::new() }
    }

    /// Keep rows where `column op value`. Several filters are ANDed.
    pub fn filter(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.filters.push(Filter { column: column.into(), op, value: value.into() });
        self
    }

    /// Sort by `column`; earlier calls take precedence.
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push((column.into(), ascending));
        self
    }

    pub fn run(&self, tables: &Tables) -> Result<Rows, CatalogError> {
        let view = self.view;
        let filters = self
            .filters
            .iter()
            .map(|f| Ok((view.resolve(&f.column)?, f)))
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let order = self
            .order
            .iter()
            .map(|(c, asc)| Ok((view.resolve(c)?, *asc)))
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let projection = view
            .projection()
            .iter()
            .map(|c| view.resolve(c))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let mut rows: Vec<Vec<Value>> = view
            .load(tables)
            .into_iter()
            .filter(|row| filters.iter().all(|(i, f)| f.op.holds(row[*i].compare(&f.value))))
            .collect();
        rows.sort_by(|a, b| {
            order
                .iter()
                .map(|(i, asc)| {
                    let ord = a[*i].compare(&b[*i]);
                    if *asc { ord } else { ord.reverse() }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        Ok(Rows {
            header: view
                .projection()
                .iter()
                .map(|c| c.rsplit('.').next().unwrap_or(c).to_string())
                .collect(),
            rows: rows.into_iter().map(|row| projection.iter().map(|i| row[*i].clone()).collect()).collect(),
        })
    }
}

/// Reads like the WHERE / ORDER BY tail of the equivalent SQL.
impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT FROM {}", self.view.name())?;
        if !self.filters.is_empty() {
            let conds: Vec<String> =
                self.filters.iter().map(|c| format!("{} {} ?", c.column, c.op.symbol())).collect();
            write!(f, " WHERE {}", conds.join(" AND "))?;
        }
        if !self.order.is_empty() {
            let keys: Vec<String> = self
                .order
                .iter()
                .map(|(c, asc)| format!("{c} {}", if *asc { "ASC" } else { "DESC" }))
                .collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }
        Ok(())
    }
}

/// A header row followed by zero or more data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header names paired with the first row's cells. Cells without a
    /// header, and headers without a cell, are dropped.
    pub fn first_record(&self) -> Option<Vec<(String, Value)>> {
        self.rows.first().map(|row| self.header.iter().cloned().zip(row.iter().cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        let mut c = Catalog::in_memory();
        c.seed().unwrap();
        let amd = c.register_manufacturer("AMD", 1969).unwrap();
        let rdna = c.register_architecture("RDNA 3").unwrap();
        let navi = c.register_processor("Navi 31", rdna).unwrap();
        let rx = c.register_series("RX 7000", 2022).unwrap();
        c.register_gpu("RX 7900 XTX", navi, 2500, rx, amd, 24, 99900).unwrap();
        c.register_gpu("RX 7900 XT", navi, 2400, rx, amd, 20, 89900).unwrap();
        c
    }

    #[test]
    fn details_header_uses_bare_names() {
        let rows = catalog().select(&Select::new(View::GpuDetails)).unwrap();
        assert_eq!(rows.header[0], "name");
        assert_eq!(rows.header.len(), 10);
        assert_eq!(rows.rows.len(), 3);
    }

    #[test]
    fn filters_are_anded_and_may_use_hidden_columns() {
        let q = Select::new(View::GpuDetails)
            .filter("Manufacturer.manufacturer_id", Op::Eq, 2i64)
            .filter("clock_speed_mhz", Op::Gt, "2450");
        let rows = catalog().select(&q).unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0][0], Value::from("RX 7900 XTX"));
    }

    #[test]
    fn order_by_descending_then_ascending() {
        let q = Select::new(View::GpuDetailsWithIds).order_by("manufacturer_name", false).order_by("price_cents", true);
        let names: Vec<String> = catalog().select(&q).unwrap().rows.iter().map(|r| r[1].to_string()).collect();
        assert_eq!(names, ["RTX 4090", "RX 7900 XT", "RX 7900 XTX"]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = catalog().select(&Select::new(View::ArchitectureInfo).filter("GPU.id", Op::Eq, 1i64)).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { .. }));
    }

    #[test]
    fn first_record_zips_header() {
        let q = Select::new(View::ManufacturerInfo).filter("manufacturer_id", Op::Eq, 2i64);
        let rec = catalog().select(&q).unwrap().first_record().unwrap();
        assert_eq!(
            rec,
            vec![("manufacturer_name".to_string(), Value::from("AMD")), ("founded_year".to_string(), Value::Int(1969))]
        );
        let empty = catalog().select(&Select::new(View::ManufacturerInfo).filter("manufacturer_id", Op::Eq, 9i64)).unwrap();
        assert!(empty.first_record().is_none());
    }

    #[test]
    fn display_reads_like_sql() {
        let q = Select::new(View::GpuDetails).filter("GPU.id", Op::Ge, 1i64).order_by("name", true);
        assert_eq!(q.to_string(), "SELECT FROM gpu details WHERE GPU.id >= ? ORDER BY name ASC");
    }
}

use gpu_catalog::catalog::{format_table, Catalog, CatalogError, Op, Select, TableStyle, View};
use gpu_catalog::types::Value;
use tempfile::TempDir;

#[test]
fn seed_happens_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gpus.json");
    let (first, created) = Catalog::open_or_seed(&path).unwrap();
    assert!(created);
    assert_eq!(first.tables().gpus.len(), 1);

    let (again, created) = Catalog::open_or_seed(&path).unwrap();
    assert!(!created);
    assert_eq!(again.tables(), first.tables());
}

#[test]
fn writes_are_persisted_immediately() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gpus.json");
    let mut c = Catalog::create(&path).unwrap();
    let aid = c.register_architecture("RDNA 3").unwrap();
    c.register_processor("Navi 31", aid).unwrap();

    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.tables().processors[0].proc_name, "Navi 31");
    assert_eq!(reopened.path(), Some(path.as_path()));
}

#[test]
fn unreadable_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gpus.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(Catalog::open(&path), Err(CatalogError::Parse { .. })));
}

#[test]
fn seeded_listing_matches_table_layout() {
    let mut c = Catalog::in_memory();
    c.seed().unwrap();
    let rows = c
        .select(&Select::new(View::GpuDetails).filter("price_cents", Op::Gt, 100_000i64))
        .unwrap();
    assert_eq!(rows.rows.len(), 1);
    let record = rows.first_record().unwrap();
    assert_eq!(record[0], ("name".to_string(), Value::from("RTX 4090")));

    let table = format_table(&rows, &TableStyle::default());
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("+-") && lines[0] == lines[2] && lines[2] == lines[4]);
    assert!(lines[1].contains(" name ") && lines[3].contains(" RTX 4090 "));
}

#[test]
fn unknown_column_is_reported() {
    let c = Catalog::in_memory();
    let err = c.select(&Select::new(View::ArchitectureInfo).order_by("price_cents", true)).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownColumn { .. }));
}

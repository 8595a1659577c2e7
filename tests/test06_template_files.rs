use std::io::Write;

use sql_template::prelude::*;

#[test]
fn binder_reads_template_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "SELECT * FROM t WHERE id = :id AND note <> ':id'").unwrap();

    let qp = Binder::from_file(file.path())
        .unwrap()
        .set("id", 7)
        .into_query_and_params()
        .unwrap();
    assert_eq!(qp.query, "SELECT * FROM t WHERE id = ? AND note <> ':id'");
    assert_eq!(qp.params, vec![RowValues::Int(7)]);
}

#[test]
fn cache_keys_files_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.sql");
    let b = dir.path().join("b.sql");
    std::fs::write(&a, "SELECT :x").unwrap();
    std::fs::write(&b, "SELECT :x").unwrap();

    let cache = TemplateCache::default();
    let first = cache.get_or_load(&a).unwrap();
    let second = cache.get_or_load(&b).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.sql");
    assert!(matches!(
        Binder::from_file(&missing),
        Err(SqlTemplateError::Io(_))
    ));
    assert!(matches!(
        TemplateCache::default().get_or_load(&missing),
        Err(SqlTemplateError::Io(_))
    ));
}

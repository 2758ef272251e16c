use sumfile_fs::{
    AtomicWriteOptions, Error, atomic_read, atomic_write, read_text, remove_if_exists, resolve,
    resolve_entry,
};
use tempfile::tempdir;

#[test]
fn test_atomic_write_basic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.sha256");

    atomic_write(&path, b"abc *a.txt\n", AtomicWriteOptions::new()).unwrap();

    assert!(path.exists());
    assert_eq!(atomic_read(&path).unwrap(), b"abc *a.txt\n");
}

#[test]
fn test_atomic_write_replaces_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.txt");

    std::fs::write(&path, "original").unwrap();

    let result = atomic_write(&path, b"new content", AtomicWriteOptions::new());

    assert!(result.is_ok());
    assert_eq!(read_text(&path).unwrap(), "new content");
}

#[test]
fn test_read_missing_reports_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let err = atomic_read(&path).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.path(), path.as_path());
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn test_remove_then_resolve_round() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "a,b\n").unwrap();

    let before = resolve(&path).unwrap();
    assert!(remove_if_exists(&path).unwrap());
    let after = resolve(&path).unwrap();

    assert_eq!(before, after);
    assert_eq!(resolve_entry(&path).unwrap(), after);
}

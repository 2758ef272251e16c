use std::fs;
use std::path::Path;

use sumfile::{
    Algorithm, Checksums, DirectoryManifest, Error, ErrorKind, OverwritePolicy, ParseOptions,
    Settings, SingleFileManifest, WriteOptions,
};
use tempfile::tempdir;

const H1: &str = "1111111111111111111111111111111111111111111111111111111111111111";
const H2: &str = "2222222222222222222222222222222222222222222222222222222222222222";

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_record_and_verify_file_manifest() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write_file(&data, "a,b\n1,2\n");
    let checksums = Checksums::default();

    let digest = checksums
        .record_digests(&data, true, false, OverwritePolicy::Always)
        .unwrap()
        .unwrap();

    let manifest = fs::read_to_string(dir.path().join("data.csv.sha256")).unwrap();
    assert_eq!(manifest, format!("{digest} *data.csv\n"));
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(
        checksums.verify_any(&data, true, false, None).unwrap(),
        Some(digest.clone())
    );

    fs::write(&data, "a,b\n1,3\n").unwrap();
    let err = checksums.verify_any(&data, true, false, None).unwrap_err();
    assert!(matches!(err, Error::DigestMismatch { .. }));
    assert!(err.is_integrity_failure());
}

#[test]
fn test_directory_manifest_policies() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    write_file(&out.join("a.txt"), "a");
    write_file(&out.join("b.txt"), "b");

    let manifest = DirectoryManifest::for_directory(&out, Algorithm::Sha256).unwrap();
    let manifest = manifest.append([("a.txt", H1)], OverwritePolicy::Never).unwrap();
    let manifest = manifest.append([("b.txt", H2)], OverwritePolicy::Never).unwrap();
    assert_eq!(manifest.len(), 2);

    let err = manifest.append([("a.txt", H1)], OverwritePolicy::Never).unwrap_err();
    assert!(matches!(err, Error::EntryExists { .. }));

    let unchanged = manifest.append([("a.txt", H1)], OverwritePolicy::OnlyIfSame).unwrap();
    assert_eq!(unchanged, manifest);

    manifest.write(WriteOptions::new()).unwrap();
    let text = fs::read_to_string(out.join("out.sha256")).unwrap();
    assert_eq!(text, format!("{H1} *a.txt\n{H2} *b.txt\n"));
}

#[test]
fn test_subdirectory_entries() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let path = out.join("out.sha256");
    write_file(&path, "deadbeef  sub/dir/file.txt\n");

    let err = DirectoryManifest::parse(&path, false).unwrap_err();
    assert!(matches!(err, Error::Subdirectory { .. }));
    assert_eq!(err.kind(), ErrorKind::Structure);

    let manifest =
        DirectoryManifest::parse_with(&path, ParseOptions::new().subdirs(true)).unwrap();
    assert_eq!(manifest.get("sub/dir/file.txt"), Some("deadbeef"));
}

#[test]
fn test_record_to_both_manifests() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    write_file(&out.join("a.txt"), "alpha");
    write_file(&out.join("b.txt"), "beta");
    let checksums = Checksums::new(Algorithm::Sha256);

    let a = checksums
        .record_digests(out.join("a.txt"), true, true, OverwritePolicy::Never)
        .unwrap()
        .unwrap();
    let b = checksums
        .record_digests(out.join("b.txt"), false, true, OverwritePolicy::Never)
        .unwrap()
        .unwrap();

    assert!(out.join("a.txt.sha256").exists());
    assert!(!out.join("b.txt.sha256").exists());

    let dirsum = checksums.load_dirsum_of_dir(&out, false).unwrap();
    assert_eq!(dirsum.get("a.txt"), Some(a.as_str()));
    assert_eq!(dirsum.get("b.txt"), Some(b.as_str()));

    checksums.verify_any(out.join("a.txt"), true, true, Some(&a)).unwrap();
    checksums.verify_any(out.join("b.txt"), false, true, None).unwrap();

    let err = checksums.verify_any(out.join("b.txt"), false, true, Some(&a)).unwrap_err();
    assert!(matches!(err, Error::DigestMismatch { .. }));
}

#[test]
fn test_record_never_leaves_manifests_untouched() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("out").join("data.bin");
    write_file(&data, "v1");
    let checksums = Checksums::default();

    checksums.record_digests(&data, true, true, OverwritePolicy::Never).unwrap();
    let filesum = checksums.filesum_of_file(&data);
    let dirsum = checksums.dirsum_of_file(&data).unwrap();
    let file_before = fs::read_to_string(&filesum).unwrap();
    let dir_before = fs::read_to_string(&dirsum).unwrap();

    fs::write(&data, "v2").unwrap();
    let err = checksums.record_digests(&data, true, true, OverwritePolicy::Never).unwrap_err();
    assert!(matches!(err, Error::EntryExists { .. }));

    // neither manifest was rewritten
    assert_eq!(fs::read_to_string(&filesum).unwrap(), file_before);
    assert_eq!(fs::read_to_string(&dirsum).unwrap(), dir_before);

    let err = checksums
        .record_digests(&data, false, true, OverwritePolicy::OnlyIfSame)
        .unwrap_err();
    assert!(matches!(err, Error::EntryConflict { .. }));
    assert_eq!(fs::read_to_string(&dirsum).unwrap(), dir_before);

    let updated = checksums
        .record_digests(&data, true, true, OverwritePolicy::Always)
        .unwrap()
        .unwrap();
    checksums.verify_any(&data, true, true, Some(&updated)).unwrap();
}

#[test]
fn test_record_only_if_same_is_idempotent() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.bin");
    write_file(&data, "payload");
    let checksums = Checksums::default();

    let first = checksums
        .record_digests(&data, true, true, OverwritePolicy::OnlyIfSame)
        .unwrap();
    let second = checksums
        .record_digests(&data, true, true, OverwritePolicy::OnlyIfSame)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(checksums.load_dirsum_of_file(&data, false).unwrap().len(), 1);
}

#[test]
fn test_verify_missing_manifests() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.bin");
    write_file(&data, "payload");
    let checksums = Checksums::default();

    let err = checksums.verify_any(&data, true, false, None).unwrap_err();
    assert!(matches!(err, Error::ManifestMissing { .. }));
    let err = checksums.verify_any(&data, false, true, None).unwrap_err();
    assert!(matches!(err, Error::ManifestMissing { .. }));

    checksums.record_digests(&data, true, false, OverwritePolicy::Always).unwrap();
    let other = dir.path().join("other.bin");
    write_file(&other, "other");
    checksums.record_digests(&other, false, true, OverwritePolicy::Always).unwrap();

    let err = checksums.verify_any(&data, true, true, None).unwrap_err();
    assert!(matches!(err, Error::EntryMissing { .. }));
}

#[test]
fn test_verify_wrong_expectation_without_manifest() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.bin");
    write_file(&data, "payload");
    let checksums = Checksums::default();

    let err = checksums.verify_any(&data, true, false, Some("00")).unwrap_err();
    assert!(matches!(err, Error::DigestMismatch { .. }));
    assert!(err.is_integrity_failure());
    assert!(!SingleFileManifest::path_for(&data, Algorithm::Sha256).exists());
}

#[test]
fn test_verify_missing_payload() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.bin");
    let checksums = Checksums::default();

    let err = checksums.verify_any(&data, false, false, Some(H1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Filesystem);
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_delete_any() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    write_file(&out.join("a.txt"), "alpha");
    write_file(&out.join("b.txt"), "beta");
    let checksums = Checksums::default();

    for name in ["a.txt", "b.txt"] {
        checksums
            .record_digests(out.join(name), true, true, OverwritePolicy::Never)
            .unwrap();
    }

    checksums.delete_any(out.join("a.txt"), true).unwrap();
    assert!(!out.join("a.txt.sha256").exists());
    let dirsum = checksums.load_dirsum_of_dir(&out, false).unwrap();
    assert_eq!(dirsum.len(), 1);
    assert!(!dirsum.contains("a.txt"));

    // deleting again is a no-op
    checksums.delete_any(out.join("a.txt"), true).unwrap();

    checksums.delete_any(out.join("b.txt"), true).unwrap();
    assert!(!out.join("out.sha256").exists());
}

#[test]
fn test_delete_any_keeps_empty_manifest() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("out").join("a.txt");
    write_file(&data, "alpha");
    let checksums = Checksums::default();

    checksums.record_digests(&data, false, true, OverwritePolicy::Never).unwrap();
    checksums.delete_any(&data, false).unwrap();

    let dirsum = checksums.dirsum_of_file(&data).unwrap();
    assert_eq!(fs::read_to_string(dirsum).unwrap(), "");
}

#[test]
fn test_generate_dirsum() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    write_file(&out.join("b.txt"), "beta");
    write_file(&out.join("a.txt"), "alpha");
    write_file(&out.join("a.txt.sha256"), "stale *a.txt\n");
    fs::create_dir(out.join("nested")).unwrap();
    let checksums = Checksums::default();

    let manifest = checksums.generate_dirsum(&out).unwrap();
    assert_eq!(manifest.len(), 2);
    assert!(!manifest.path().exists());
    assert_eq!(
        manifest.get("a.txt"),
        Some(checksums.calc_hash(out.join("a.txt")).unwrap().as_str())
    );

    manifest.write(WriteOptions::new()).unwrap();
    let lines: Vec<_> = fs::read_to_string(manifest.path())
        .unwrap()
        .lines()
        .map(|l| l.split_once(" *").unwrap().1.to_string())
        .collect();
    assert_eq!(lines, ["a.txt", "b.txt"]);

    for name in ["a.txt", "b.txt"] {
        checksums.verify_any(out.join(name), false, true, None).unwrap();
    }
}

#[test]
fn test_generate_dirsum_matching() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    write_file(&out.join("a.csv"), "alpha");
    write_file(&out.join("b.csv"), "beta");
    write_file(&out.join("notes.txt"), "skip me");
    let checksums = Checksums::default();

    let manifest = checksums.generate_dirsum_matching(&out, "*.csv").unwrap();
    assert_eq!(manifest.len(), 2);
    assert!(manifest.get("notes.txt").is_none());
    assert_eq!(checksums.generate_dirsum(&out).unwrap().len(), 3);

    let err = checksums.generate_dirsum_matching(&out, "[").unwrap_err();
    assert!(matches!(err, Error::Pattern(_)));
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn test_single_file_manifest_rename_on_record() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write_file(&data, "a,b\n");
    write_file(&dir.path().join("data.csv.md5"), &format!("{} *old-name.csv\n", "0".repeat(32)));
    let checksums = Checksums::new(Algorithm::Md5);

    checksums.record_digests(&data, true, false, OverwritePolicy::Always).unwrap();
    let manifest = SingleFileManifest::parse(&data, Algorithm::Md5).unwrap();
    assert_eq!(manifest.file_path().file_name().unwrap(), "data.csv");
    checksums.verify_any(&data, true, false, None).unwrap();
}

#[test]
fn test_settings_drive_engine() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("sumfile.toml");
    fs::write(&config, "algorithm = \"blake2b\"\nsort = true\nsubdirs = true\n").unwrap();
    let checksums = Checksums::from_settings(&Settings::load(&config).unwrap()).unwrap();

    let out = dir.path().join("out");
    write_file(&out.join("z.txt"), "z");
    write_file(&out.join("m.txt"), "m");
    for name in ["z.txt", "m.txt"] {
        checksums
            .record_digests(out.join(name), false, true, OverwritePolicy::Never)
            .unwrap();
    }

    let text = fs::read_to_string(out.join("out.blake2b")).unwrap();
    let names: Vec<_> = text.lines().map(|l| l.split_once(" *").unwrap().1).collect();
    assert_eq!(names, ["m.txt", "z.txt"]);
    assert_eq!(Checksums::guess_algorithm(out.join("out.blake2b")).unwrap(), Algorithm::Blake2b);
}

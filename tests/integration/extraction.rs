//! Extraction of archives stored on disk.

use crate::common::{Entry, build_zip, sdk_zip};
use sdkup::archive::ArchiveExtractor;
use sdkup::core::SdkError;
use tempfile::TempDir;

fn write_archive(dir: &TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("archive.zip");
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_extract_sdk_archive_from_file() {
    let downloads = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let archive = write_archive(&downloads, &sdk_zip("1.9.50"));

    let summary = ArchiveExtractor::new(target.path()).extract(&archive).unwrap();
    assert_eq!(summary.files, 4);
    assert_eq!(summary.directories, 1);

    let marker = std::fs::read_to_string(target.path().join("go_appengine/VERSION")).unwrap();
    assert!(marker.starts_with("release: \"1.9.50\""));
    assert_eq!(
        std::fs::read(target.path().join("go_appengine/goroot/src/net/http/server.go")).unwrap(),
        b"package http\n"
    );
}

#[test]
fn test_extract_missing_archive_is_filesystem_error() {
    let target = TempDir::new().unwrap();
    let err = ArchiveExtractor::new(target.path())
        .extract(&target.path().join("absent.zip"))
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<SdkError>(), Some(SdkError::FileSystemError { .. })));
}

#[test]
fn test_extract_rejects_archive_with_parent_escape() {
    let downloads = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let archive = write_archive(
        &downloads,
        &build_zip(&[
            Entry::File("go_appengine/ok.txt", b"ok", 0o644),
            Entry::File("go_appengine/../../evil.txt", b"evil", 0o644),
        ]),
    );

    let err = ArchiveExtractor::new(target.path()).extract(&archive).unwrap_err();
    assert!(matches!(err.downcast_ref::<SdkError>(), Some(SdkError::UnsafeArchivePath { .. })));
    assert!(std::fs::read_dir(target.path()).unwrap().next().is_none());
}

#[cfg(unix)]
#[test]
fn test_extract_directory_modes() {
    use std::os::unix::fs::PermissionsExt;

    let downloads = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let archive = write_archive(
        &downloads,
        &build_zip(&[
            Entry::Dir("sdk/", 0o755),
            Entry::Dir("sdk/private/", 0o700),
            Entry::File("sdk/private/key", b"secret", 0o600),
        ]),
    );

    ArchiveExtractor::new(target.path()).extract(&archive).unwrap();

    let mode =
        |rel: &str| std::fs::metadata(target.path().join(rel)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode("sdk/private"), 0o700);
    assert_eq!(mode("sdk/private/key"), 0o600);
}

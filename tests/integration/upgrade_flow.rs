//! Full update runs against an in-memory release server.

use crate::common::{MemoryFetcher, dir_names, install_sdk, read_marker, sdk_zip};
use sdkup::core::SdkError;
use sdkup::upgrade::{InstallOutcome, InstallState, SdkUpdater, UpdaterContext};
use sdkup::version::Version;
use tempfile::TempDir;

#[tokio::test]
async fn test_upgrade_from_1_9_48_to_1_9_50() {
    let temp = TempDir::new().unwrap();
    install_sdk(temp.path(), "1.9.48");

    let fetcher = MemoryFetcher::new("1.9.50").with_archive("1.9.50", sdk_zip("1.9.50"));
    let updater = SdkUpdater::new(fetcher, UpdaterContext::new(temp.path()));

    let outcome = updater.reconcile().await.unwrap();
    assert!(matches!(outcome, InstallOutcome::Upgraded { .. }));
    assert_eq!(outcome.version().as_str(), "1.9.50");

    assert_eq!(dir_names(temp.path()), vec!["go_appengine", "go_appengine-1.9.48"]);
    assert!(read_marker(temp.path()).contains("\"1.9.50\""));
    assert!(temp.path().join("go_appengine/goroot/src/net/http/server.go").is_file());
    assert!(!temp.path().join("go_appengine/only-in-1.9.48").exists());
    assert!(temp.path().join("go_appengine-1.9.48/only-in-1.9.48").exists());
    assert_eq!(updater.fetcher().archive_requests(), vec!["1.9.50"]);

    // A second run finds nothing to do
    let updater = SdkUpdater::new(
        MemoryFetcher::new("1.9.50").with_archive("1.9.50", sdk_zip("1.9.50")),
        UpdaterContext::new(temp.path()),
    );
    let outcome = updater.reconcile().await.unwrap();
    assert!(matches!(outcome, InstallOutcome::UpToDate { .. }));
    assert!(updater.fetcher().archive_requests().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_upgrade_preserves_archive_modes() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    install_sdk(temp.path(), "1.9.48");

    let fetcher = MemoryFetcher::new("1.9.50").with_archive("1.9.50", sdk_zip("1.9.50"));
    SdkUpdater::new(fetcher, UpdaterContext::new(temp.path())).reconcile().await.unwrap();

    let mode = |rel: &str| {
        std::fs::metadata(temp.path().join(rel)).unwrap().permissions().mode() & 0o777
    };
    assert_eq!(mode("go_appengine/goapp"), 0o755);
    assert_eq!(mode("go_appengine/appcfg.py"), 0o750);
    assert_eq!(mode("go_appengine/VERSION"), 0o644);
}

#[tokio::test]
async fn test_downgrade_is_treated_as_upgrade() {
    let temp = TempDir::new().unwrap();
    install_sdk(temp.path(), "1.9.50");

    let fetcher = MemoryFetcher::new("1.9.50").with_archive("1.9.40", sdk_zip("1.9.40"));
    let context = UpdaterContext::new(temp.path())
        .with_desired_version(Some(Version::parse_normalized("1.9.40")));
    let updater = SdkUpdater::new(fetcher, context);

    let plan = updater.plan().await.unwrap();
    assert_eq!(
        plan.state,
        InstallState::UpgradeNeeded {
            installed: Version::parse_normalized("1.9.50")
        }
    );

    updater.apply(&plan).await.unwrap();
    assert!(read_marker(temp.path()).contains("\"1.9.40\""));
    assert!(temp.path().join("go_appengine-1.9.50").is_dir());
}

#[tokio::test]
async fn test_missing_archive_restores_previous_install() {
    let temp = TempDir::new().unwrap();
    install_sdk(temp.path(), "1.9.48");

    // Manifest advertises a release the server has no archive for
    let fetcher = MemoryFetcher::new("1.9.51");
    let updater = SdkUpdater::new(fetcher, UpdaterContext::new(temp.path()));

    let err = updater.reconcile().await.unwrap_err();
    assert!(matches!(err.downcast_ref::<SdkError>(), Some(SdkError::NetworkError { .. })));

    assert_eq!(dir_names(temp.path()), vec!["go_appengine"]);
    assert!(read_marker(temp.path()).contains("\"1.9.48\""));
}

#[tokio::test]
async fn test_fresh_install_into_missing_install_dir() {
    let temp = TempDir::new().unwrap();
    let install_dir = temp.path().join("opt/sdk");

    let fetcher = MemoryFetcher::new("1.9.50").with_archive("1.9.50", sdk_zip("1.9.50"));
    let updater = SdkUpdater::new(fetcher, UpdaterContext::new(&install_dir));

    let outcome = updater.reconcile().await.unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::Installed {
            version: Version::parse_normalized("1.9.50"),
            location: install_dir.join("go_appengine"),
        }
    );
    assert_eq!(dir_names(&install_dir), vec!["go_appengine"]);
}

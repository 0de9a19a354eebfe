//! Staging behavior against real directories
//!
//! Toolchain steps are stood in for by `sh -c` scripts.

use std::path::Path;
use tempfile::TempDir;

use pybake_client::ClientStager;
use pybake_core::Error;

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Project with `client/` and an empty package tree
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("client")).unwrap();
    std::fs::create_dir_all(dir.path().join("src/pkg/web")).unwrap();
    dir
}

fn stager(root: &Path) -> ClientStager {
    ClientStager::new(root.join("client"), root.join("src/pkg/web/client"))
}

fn write_build(root: &Path, files: &[(&str, &str)]) {
    let build = root.join("client/build");
    let _ = std::fs::remove_dir_all(&build);
    for (name, contents) in files {
        let path = build.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
}

fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_stage_twice_leaves_only_second_build() {
    let dir = setup_project();
    let stager = stager(dir.path());

    write_build(
        dir.path(),
        &[("index.html", "v1"), ("static/js/old.js", "old")],
    );
    stager.stage_only().unwrap();
    assert_eq!(
        list_files(stager.staging_dir()),
        vec!["index.html", "static/js/old.js"]
    );

    write_build(
        dir.path(),
        &[("index.html", "v2"), ("static/css/new.css", "new")],
    );
    let report = stager.stage_only().unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(
        list_files(stager.staging_dir()),
        vec!["index.html", "static/css/new.css"]
    );
    let index = std::fs::read_to_string(stager.staging_dir().join("index.html")).unwrap();
    assert_eq!(index, "v2");
}

#[test]
fn test_stage_without_build_output_empties_staging_dir() {
    let dir = setup_project();
    let stager = stager(dir.path());
    std::fs::create_dir_all(stager.staging_dir()).unwrap();
    std::fs::write(stager.staging_dir().join("stale.js"), "stale").unwrap();

    let err = stager.stage_only().unwrap_err();

    match err {
        Error::MissingBuildOutput { path } => {
            assert_eq!(path, dir.path().join("client/build"));
        }
        other => panic!("expected MissingBuildOutput, got {other:?}"),
    }
    // Wiped and recreated, never repopulated
    assert!(stager.staging_dir().is_dir());
    assert!(list_files(stager.staging_dir()).is_empty());
}

#[tokio::test]
async fn test_build_and_stage_runs_toolchain_then_stages() {
    let dir = setup_project();
    let stager = stager(dir.path())
        .with_install(sh("mkdir -p node_modules"))
        .with_build(sh("mkdir -p build/static && echo bundle > build/static/app.js"));

    let report = stager.build_and_stage().await.unwrap();

    assert_eq!(report.files, 1);
    assert!(dir.path().join("client/node_modules").is_dir());
    assert!(stager.staging_dir().join("static/app.js").is_file());
}

#[tokio::test]
async fn test_failed_install_aborts_before_staging() {
    let dir = setup_project();
    let stager = stager(dir.path())
        .with_install(sh("exit 1"))
        .with_build(sh("mkdir -p build && touch build/never"));
    std::fs::create_dir_all(stager.staging_dir()).unwrap();
    std::fs::write(stager.staging_dir().join("keep.js"), "previous").unwrap();

    let err = stager.build_and_stage().await.unwrap_err();

    assert!(matches!(err, Error::ExternalToolFailure { ref step, .. } if step == "install"));
    assert!(!dir.path().join("client/build").exists());
    assert_eq!(list_files(stager.staging_dir()), vec!["keep.js"]);
}

#[tokio::test]
async fn test_failed_build_aborts_before_staging() {
    let dir = setup_project();
    write_build(dir.path(), &[("index.html", "old build")]);
    let stager = stager(dir.path())
        .with_install(sh("true"))
        .with_build(sh("exit 2"));

    let err = stager.build_and_stage().await.unwrap_err();

    assert!(matches!(err, Error::ExternalToolFailure { ref step, .. } if step == "build"));
    assert!(!stager.staging_dir().exists());
}

#[cfg(unix)]
#[test]
fn test_stage_follows_linked_directories_and_files() {
    let dir = setup_project();
    write_build(
        dir.path(),
        &[("real/app.js", "app"), ("index.html", "<html/>")],
    );
    let build = dir.path().join("client/build");
    std::os::unix::fs::symlink(build.join("real"), build.join("alias")).unwrap();
    std::os::unix::fs::symlink(build.join("index.html"), build.join("home.html")).unwrap();

    let stager = stager(dir.path());
    let report = stager.stage_only().unwrap();

    assert_eq!(report.files, 4);
    assert_eq!(
        list_files(stager.staging_dir()),
        vec!["alias/app.js", "home.html", "index.html", "real/app.js"]
    );
    let staged_alias = stager.staging_dir().join("alias");
    assert!(!staged_alias.symlink_metadata().unwrap().file_type().is_symlink());
}

#[test]
fn test_stage_replaces_file_at_staging_path() {
    let dir = setup_project();
    write_build(dir.path(), &[("index.html", "fresh")]);
    let stager = stager(dir.path());
    std::fs::write(stager.staging_dir(), "not a directory").unwrap();

    stager.stage_only().unwrap();

    assert!(stager.staging_dir().is_dir());
    assert_eq!(list_files(stager.staging_dir()), vec!["index.html"]);
}

#[test]
fn test_stage_reports_filesystem_failure() {
    let dir = setup_project();
    write_build(dir.path(), &[("index.html", "fresh")]);
    // A regular file where a parent directory of the staging path must go
    let blocker = dir.path().join("src/pkg/blocked");
    std::fs::write(&blocker, "file").unwrap();
    let stager = ClientStager::new(dir.path().join("client"), blocker.join("client"));

    let err = stager.stage_only().unwrap_err();

    match err {
        Error::DirectoryStagingFailure { path, .. } => {
            assert!(path.starts_with(&blocker));
        }
        other => panic!("expected DirectoryStagingFailure, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "file");
}

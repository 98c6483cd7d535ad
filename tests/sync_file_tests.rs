use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use plot2d::PlotError;
use plot2d::core::SyncFile;

fn scratch_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("plot2d-{}-{name}", std::process::id()));
    fs::write(&path, b"sync").expect("write scratch file");
    path
}

#[test]
fn touching_the_file_is_reported_once() {
    let path = scratch_file("touch");
    let mut sync = SyncFile::new(&path).expect("watch");
    assert_eq!(sync.path(), Some(path.as_path()));
    assert!(!sync.is_modified().expect("poll"));

    let file = File::options().write(true).open(&path).expect("open");
    file.set_modified(SystemTime::now() + Duration::from_secs(3600))
        .expect("set mtime");
    drop(file);

    assert!(sync.is_modified().expect("poll"));
    assert!(!sync.is_modified().expect("poll"));
    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn empty_path_never_changes() {
    let mut sync = SyncFile::new("").expect("watch nothing");
    assert_eq!(sync.path(), None);
    assert!(!sync.is_modified().expect("poll"));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join(format!("plot2d-{}-missing", std::process::id()));
    let err = SyncFile::new(&path).expect_err("missing file");
    assert!(matches!(err, PlotError::Io(_)));
}

use modconf_fs::{EntryKind, NormalizedPath, io};
use tempfile::tempdir;

#[test]
fn entry_kind_distinguishes_files_and_directories() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.json");
    std::fs::write(&file, "{}").unwrap();

    assert_eq!(
        io::entry_kind(&NormalizedPath::new(dir.path())).unwrap(),
        EntryKind::Directory
    );
    assert_eq!(
        io::entry_kind(&NormalizedPath::new(&file)).unwrap(),
        EntryKind::File
    );
}

#[test]
fn entry_kind_of_missing_path_is_not_found() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("missing"));

    let err = io::entry_kind(&path).unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn read_text_nonexistent_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("does_not_exist.txt"));

    assert!(io::read_text(&path).is_err());
}

#[cfg(unix)]
#[test]
fn entry_kind_follows_symlinks() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real");
    std::fs::create_dir(&target).unwrap();
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    assert_eq!(
        io::entry_kind(&NormalizedPath::new(&link)).unwrap(),
        EntryKind::Directory
    );
}

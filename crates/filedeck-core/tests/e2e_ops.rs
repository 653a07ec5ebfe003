/// End-to-end tests for listing, mutation, and size aggregation against a
/// real temporary filesystem.
use filedeck_core::platform::Trash;
use filedeck_core::{
    compute_size, copy_tree, create_directory, list_directory, paste_into, rename_path,
    EntryKind, ErrorKind,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// ```text
/// root/
///   docs/
///     deep/
///       x.bin  (1 000 bytes)
///     y.txt    (250 bytes)
///   empty/
///   z.log      (5 bytes)
/// ```
fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("docs/deep")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    write_bytes(&root.join("docs/deep/x.bin"), 1_000);
    write_bytes(&root.join("docs/y.txt"), 250);
    write_bytes(&root.join("z.log"), 5);
}

/// Drop all permissions on `dir` and report whether that actually blocks
/// this process (it does not for root).
#[cfg(unix)]
fn lock_down(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    fs::read_dir(dir).is_err()
}

#[cfg(unix)]
fn unlock(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[test]
fn listing_matches_os_classification() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let entries = list_directory(tmp.path()).unwrap();
    assert_eq!(entries.len(), 3, "only immediate children: {entries:?}");
    for entry in &entries {
        let os_is_dir = fs::metadata(&entry.full_path).unwrap().is_dir();
        assert_eq!(entry.kind == EntryKind::Directory, os_is_dir, "{entry:?}");
        assert_eq!(entry.full_path.parent(), Some(tmp.path()));
    }
}

#[cfg(unix)]
#[test]
fn listing_unreadable_dir_is_permission_denied() {
    let tmp = TempDir::new().unwrap();
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    if !lock_down(&locked) {
        unlock(&locked);
        return; // running with elevated privileges
    }

    let denied = list_directory(&locked).unwrap_err();
    let missing = list_directory(&tmp.path().join("missing")).unwrap_err();
    unlock(&locked);

    assert_eq!(denied.kind(), ErrorKind::PermissionDenied);
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

// ── Size ─────────────────────────────────────────────────────────────────────

#[test]
fn size_of_tree_is_sum_of_files() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    assert_eq!(compute_size(tmp.path()), 1_255);
    assert_eq!(compute_size(&tmp.path().join("docs")), 1_250);
    assert_eq!(compute_size(&tmp.path().join("z.log")), 5);
    assert_eq!(compute_size(&tmp.path().join("empty")), 0);
}

#[cfg(unix)]
#[test]
fn size_skips_unreadable_subtree() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let deep = tmp.path().join("docs/deep");
    if !lock_down(&deep) {
        unlock(&deep);
        return;
    }

    let total = compute_size(tmp.path());
    unlock(&deep);

    assert_eq!(total, 255, "locked subtree must contribute 0");
}

// ── Mutations ────────────────────────────────────────────────────────────────

#[test]
fn rename_onto_existing_leaves_both() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    let b = tmp.path().join("b.txt");
    fs::write(&a, b"aaa").unwrap();
    fs::write(&b, b"bbb").unwrap();

    let err = rename_path(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&a).unwrap(), b"aaa");
    assert_eq!(fs::read(&b).unwrap(), b"bbb");
}

#[test]
fn rename_moves_between_directories() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let from = tmp.path().join("z.log");
    let to = tmp.path().join("empty/z.log");

    rename_path(&from, &to).unwrap();
    assert!(!from.exists());
    assert_eq!(fs::metadata(&to).unwrap().len(), 5);
}

#[test]
fn rename_missing_source_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = rename_path(&tmp.path().join("nope"), &tmp.path().join("new")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn delete_without_trash_is_unsupported_and_harmless() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let target = tmp.path().join("docs");

    let err = Trash::Unavailable.delete(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(compute_size(&target), 1_250);
}

#[test]
fn copy_tree_onto_existing_dir_is_refused() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    build_tree(&src);
    let dst = tmp.path().join("dst");
    fs::create_dir(&dst).unwrap();
    write_bytes(&dst.join("keep.me"), 3);

    let err = copy_tree(&src, &dst).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(list_directory(&dst).unwrap().len(), 1);
}

#[test]
fn copy_tree_reproduces_structure() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    build_tree(&src);
    let dst = tmp.path().join("out/copy");

    let stats = copy_tree(&src, &dst).unwrap();
    assert_eq!(stats.files, 3);
    assert_eq!(stats.bytes, 1_255);
    assert!(dst.join("empty").is_dir());
    assert_eq!(compute_size(&dst), compute_size(&src));
}

#[cfg(unix)]
#[test]
fn copy_tree_failure_leaves_no_partial_tree() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    build_tree(&src);
    let secret = src.join("docs/y.txt");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&secret).is_ok() {
        return; // running with elevated privileges
    }

    let dst = tmp.path().join("dst");
    let err = copy_tree(&src, &dst).unwrap_err();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(!dst.exists(), "partial copy must be rolled back");
}

#[test]
fn paste_routes_files_and_directories() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let target = tmp.path().join("target");
    create_directory(&target).unwrap();

    let pasted_dir = paste_into(&tmp.path().join("docs"), &target).unwrap();
    let pasted_file = paste_into(&tmp.path().join("z.log"), &target).unwrap();

    assert_eq!(pasted_dir, target.join("docs"));
    assert_eq!(compute_size(&pasted_dir), 1_250);
    assert_eq!(pasted_file, target.join("z.log"));
    assert_eq!(fs::metadata(&pasted_file).unwrap().len(), 5);

    // Pasting the same directory twice does not merge.
    let again = paste_into(&tmp.path().join("docs"), &target).unwrap_err();
    assert_eq!(again.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn paste_into_own_directory_keeps_source() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());
    let report = tmp.path().join("report.txt");
    fs::write(&report, b"precious contents").unwrap();

    let err = paste_into(&report, tmp.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
    assert_eq!(fs::read(&report).unwrap(), b"precious contents");

    let docs = tmp.path().join("docs");
    let before = compute_size(&docs);
    assert!(paste_into(&docs, tmp.path()).is_err());
    assert_eq!(compute_size(&docs), before);
}

#[test]
fn listing_paths_are_normalised() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path());

    let entries = list_directory(&tmp.path().join("docs").join("..")).unwrap();
    let docs = entries.iter().find(|e| e.name == "docs").unwrap();
    assert_eq!(docs.full_path, tmp.path().join("docs"));
    assert!(entries
        .iter()
        .all(|e| !e.full_path.components().any(|c| c == std::path::Component::ParentDir)));
}

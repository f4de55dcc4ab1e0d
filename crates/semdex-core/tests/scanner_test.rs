use semdex_config::CoreConfig;
use semdex_core::scanner::walk;
use std::fs;
use tempfile::tempdir;

#[test]
fn walk_respects_ignore_dirs_and_extensions() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("src/main.py"), "print('ok')").unwrap();
    fs::write(root.join("src/nested/lib.rs"), "fn lib() {}").unwrap();
    fs::write(root.join("src/logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
    fs::write(root.join("node_modules/pkg/index.js"), "module.exports = 1").unwrap();
    fs::write(root.join(".git/config.yml"), "x: 1").unwrap();
    fs::write(root.join("README.md"), "# readme").unwrap();

    let files = walk(root, &CoreConfig::default()).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

    assert_eq!(paths, vec!["README.md", "src/main.py", "src/nested/lib.rs"]);
}

#[test]
fn walk_decodes_invalid_utf8_permissively() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.py"), b"ok = 1\n\xff\xfe\nend = 2\n").unwrap();

    let files = walk(dir.path(), &CoreConfig::default()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].text.starts_with("ok = 1\n"));
    assert!(files[0].text.contains("end = 2"));
}

#[test]
fn walk_uses_configured_allow_list() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.rs"), "fn a() {}").unwrap();
    fs::write(dir.path().join("b.py"), "b = 1").unwrap();

    let config = CoreConfig {
        include_extensions: vec!["rs".to_string()],
        ..Default::default()
    };
    let files = walk(dir.path(), &config).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].relative_path, "a.rs");
}

#[test]
fn walk_rejects_missing_root() {
    let dir = tempdir().unwrap();
    assert!(walk(&dir.path().join("missing"), &CoreConfig::default()).is_err());
}

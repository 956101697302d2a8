use blockpuzzle::config::Config;

#[test]
fn create_default_then_load() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let path = tmpdir.path().join("config.toml");
    let path = path.to_string_lossy().to_string();

    tokio_test::block_on(Config::create_default(&path)).expect("create default");
    let config = tokio_test::block_on(Config::load(&path)).expect("load");
    assert_eq!(config.engine.progress_store, "level");
    assert_eq!(config.engine.effective_prefix(), "!");
    assert_eq!(config.storage.data_dir, "./data/world");
}

#[test]
fn load_reports_missing_and_malformed_files() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let missing = tmpdir.path().join("nope.toml").to_string_lossy().to_string();
    let err = tokio_test::block_on(Config::load(&missing)).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));

    let bad = tmpdir.path().join("bad.toml");
    std::fs::write(&bad, "[engine\nname = 1").expect("write");
    let err = tokio_test::block_on(Config::load(&bad.to_string_lossy())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

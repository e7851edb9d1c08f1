use meshfish::app::FishingApp;
use meshfish::config::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn edited_config_drives_the_command_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meshfish.toml");
    let path_str = path.to_str().unwrap().to_string();
    let data_dir = dir.path().join("data");

    let text = format!(
        r#"
[fishing]
cooldown_seconds = 0
reveal_delay_seconds = [0, 0]

[storage]
data_dir = "{}"

[logging]
level = "warn"

[commands]
prefix = "!"
admins = ["sysop"]
"#,
        data_dir.to_string_lossy().replace('\\', "/")
    );
    std::fs::write(&path, text).unwrap();

    let config = tokio_test::block_on(Config::load(&path_str)).expect("load");
    assert_eq!(config.commands.prefix, "!");
    assert_eq!(config.fishing.cooldown_seconds, 0);
    assert_eq!(config.fishing.rods.len(), 5);
    assert_eq!(config.logging.file, None);

    let mut app = FishingApp::open(&config).expect("app");
    let mut rng = StdRng::seed_from_u64(99);
    assert!(app.processor.handle("ivy", None, "^FISH", &mut rng).is_none());
    for _ in 0..3 {
        let reply = app.processor.handle("ivy", None, "!fish", &mut rng).expect("cast");
        assert!(reply.reveal_delay.is_zero());
        assert!(!reply.text.starts_with("Your line is still wet"));
    }
    assert_eq!(app.service.stats("ivy").unwrap().total_catch_count, 3);
    assert!(data_dir.join("fishing").exists());
}

#[test]
fn missing_file_is_an_error_naming_the_path() {
    let err = tokio_test::block_on(Config::load("/definitely/not/here.toml")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}

#[test]
fn absent_file_falls_back_but_broken_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.toml");
    let loaded = tokio_test::block_on(Config::load_if_present(absent.to_str().unwrap()));
    assert!(loaded.expect("absent is not an error").is_none());

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[fishing\ncooldown_seconds = 3\n").unwrap();
    let path = broken.to_str().unwrap().to_string();
    let err = tokio_test::block_on(Config::load_if_present(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
    assert!(err.to_string().contains(&path));
}

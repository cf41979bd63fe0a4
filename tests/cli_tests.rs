use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary from an empty directory so no stray config file is picked up
fn shortclip(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shortclip").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("SHORTCLIP_CONFIG")
        .env_remove("SHORTCLIP_MIN_WINDOW_SECS")
        .env_remove("SHORTCLIP_MIN_CROP_PX")
        .env_remove("SHORTCLIP_MEDIA_DIR")
        .env_remove("SHORTCLIP_LOG_LEVEL");
    cmd
}

#[test]
fn test_plan_landscape_to_vertical() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "60", "--width", "1920", "--height", "1080"])
        .args(["--start", "0", "--end", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Window: 00:00.000 -> 00:10.000"))
        .stdout(predicate::str::contains("Crop:   608x1080+656+0"));
}

#[test]
fn test_plan_clamps_end_to_source() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "10", "--width", "1080", "--height", "1920"])
        .args(["--start", "0", "--end", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:00.000 -> 00:10.000"))
        .stdout(predicate::str::contains("(full frame)"));
}

#[test]
fn test_plan_json_output() {
    let dir = TempDir::new().unwrap();
    let output = shortclip(&dir)
        .args(["plan", "--duration", "01:35.4", "--width", "1920", "--height", "1080"])
        .args(["--start", "12.25", "--end", "40.9", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["crop"]["x"], 656);
    assert_eq!(json["crop"]["width"], 608);
    assert_eq!(json["crop"]["height"], 1080);
    assert_eq!(json["window"]["start"], 12.25);
    assert_eq!(json["window"]["end"], 40.9);
    assert_eq!(json["ratio"], "9:16");
    assert_eq!(json["full_frame"], false);
}

#[test]
fn test_plan_without_window_uses_default() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "95", "--width", "1280", "--height", "720"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:00.000 -> 00:30.000"));
}

#[test]
fn test_plan_empty_window_fails() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "10", "--width", "1920", "--height", "1080"])
        .args(["--start", "10", "--end", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("clip window is empty"));
}

#[test]
fn test_plan_tiny_frame_fails() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "10", "--width", "1", "--height", "1000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("smaller than the minimum"));
}

#[test]
fn test_plan_rejects_negative_dimensions() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["plan", "--duration", "10", "--width", "-1920", "--height", "1080"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame dimensions must be positive"));
}

#[test]
fn test_plan_reads_limits_from_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("shortclip.toml"),
        "[limits]\nmin_window_secs = 5.0\n",
    )
    .unwrap();

    shortclip(&dir)
        .args(["plan", "--duration", "60", "--width", "1920", "--height", "1080"])
        .args(["--start", "1", "--end", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shorter than the minimum"));
}

#[test]
fn test_config_source_is_logged() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("shortclip.toml"), "[export]\npreset = \"fast\"\n").unwrap();

    shortclip(&dir)
        .args(["--log-level", "debug", "demos"])
        .env("SHORTCLIP_MEDIA_DIR", "media")
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded configuration from: shortclip.toml"))
        .stderr(predicate::str::contains("Found environment override: SHORTCLIP_MEDIA_DIR"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[export]\nwidth = 1081\n").unwrap();

    shortclip(&dir)
        .arg("--config")
        .arg(&config)
        .args(["demos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_demos_lists_videos() {
    let dir = TempDir::new().unwrap();
    let media = dir.path().join("media");
    std::fs::create_dir(&media).unwrap();
    std::fs::write(media.join("city_walk.mp4"), b"x").unwrap();
    std::fs::write(media.join("readme.txt"), b"x").unwrap();

    shortclip(&dir)
        .args(["demos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("City Walk"))
        .stdout(predicate::str::contains("readme").not());
}

#[test]
fn test_demos_empty_directory() {
    let dir = TempDir::new().unwrap();
    shortclip(&dir)
        .args(["demos", "--dir", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No demo videos found in nowhere"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("libvirt device XML generator in Rust"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_virtdev"));
}

#[test]
fn test_man_page_command() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.arg("man-page")
        .assert()
        .success()
        .stdout(predicate::str::contains(".TH"));
}

#[test]
fn test_graphics_vnc_minimal() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--port", "5901", "--no-keymap"])
        .assert()
        .success()
        .stdout("<graphics type='vnc' port='5901'/>\n");
}

#[test]
fn test_graphics_default_keymap_with_autodetect() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--driver", "qemu", "--driver-version", "0.12.5"])
        .assert()
        .success()
        .stdout("<graphics type='vnc' port='-1'/>\n");
}

#[test]
fn test_graphics_spice_autoport() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args([
        "graphics",
        "--type",
        "spice",
        "--tls-port",
        "5950",
        "--keymap",
        "fr",
        "--listen",
        "0.0.0.0",
        "--channel",
        "main=secure",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "<graphics type='spice' port='-1' tlsPort='5950' autoport='yes' keymap='fr' listen='0.0.0.0'>",
    ))
    .stdout(predicate::str::contains("<channel name='main' mode='secure'/>"));
}

#[test]
fn test_graphics_invalid_port() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--port", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "port must be a number between 5900 and 65535",
        ));
}

#[test]
fn test_graphics_invalid_keymap() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--keymap", "qwerty!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("keymap can only contain"));
}

#[test]
fn test_graphics_invalid_type() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--type", "x11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown graphics type"));
}

#[test]
fn test_graphics_rdp_not_renderable() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["graphics", "--type", "rdp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown graphics type"));
}

#[test]
fn test_graphics_sdl_without_display() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.env_remove("DISPLAY")
        .args(["graphics", "--type", "sdl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no display target available"));
}

#[test]
fn test_graphics_sdl() {
    let temp_home = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.env("DISPLAY", ":1")
        .env("HOME", temp_home.path())
        .args(["graphics", "--type", "sdl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<graphics type='sdl' display=':1' xauth='"))
        .stdout(predicate::str::contains(".Xauthority'/>"));
}

#[test]
fn test_video_command() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.args(["video", "--model", "vga", "--vram", "9216", "--heads", "1"])
        .assert()
        .success()
        .stdout("<video>\n  <model type='vga' vram='9216' heads='1'/>\n</video>\n");
}

#[test]
fn test_keymaps_command() {
    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.arg("keymaps")
        .assert()
        .success()
        .stdout(predicate::str::contains("en-us\n"))
        .stdout(predicate::str::contains("pt-br\n"));
}

#[test]
fn test_render_device_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("devices.json");
    fs::write(
        &file,
        r#"{
            "graphics": [ { "type": "vnc", "port": 5905, "keymap": "de", "passwd": "pw" } ],
            "video": [ { "model": "cirrus" } ]
        }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<graphics type='vnc' port='5905' keymap='de' passwd='pw'/>",
        ))
        .stdout(predicate::str::contains("<model type='cirrus'/>"));
}

#[test]
fn test_render_from_env() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("set.json");
    fs::write(&file, r#"{ "video": [ { "heads": 2 } ] }"#).unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.env("VIRTDEV_DEVICES", &file)
        .arg("render")
        .assert()
        .success()
        .stdout("<video>\n  <model heads='2'/>\n</video>\n");
}

#[test]
fn test_render_missing_file() {
    let temp_home = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.env("HOME", temp_home.path())
        .env_remove("VIRTDEV_DEVICES")
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_render_invalid_device() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("devices.json");
    fs::write(&file, r#"{ "graphics": [ { "port": 70000 } ] }"#).unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    cmd.arg("render")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("port must be a number"));
}

#[test]
fn test_install_fish_completions() {
    let temp_config = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("virtdev").unwrap();
    let output = cmd
        .env("HOME", temp_config.path())
        .env("XDG_CONFIG_HOME", temp_config.path())
        .arg("install-fish")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Fish completions installed to:"));
    assert!(temp_config.path().join("fish/completions/virtdev.fish").exists());
}

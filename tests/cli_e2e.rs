//! End-to-end CLI tests for the soundtrack-dl binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::{socket_skip_return, start_mock_server_or_skip};

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return socket_skip_return();
        };
        mock_server
    }};
}

/// Binary command isolated from the user's config and log settings.
fn soundtrack_dl(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("soundtrack-dl").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    soundtrack_dl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download every track of a soundtrack album"))
        .stdout(predicate::str::contains("ALBUM_URL"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    soundtrack_dl(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("soundtrack-dl"));
}

#[test]
fn test_binary_missing_album_url_returns_error() {
    let home = TempDir::new().unwrap();
    soundtrack_dl(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ALBUM_URL"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    soundtrack_dl(&home)
        .args(["https://example.com/album", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_invalid_album_url_returns_error() {
    let home = TempDir::new().unwrap();
    soundtrack_dl(&home)
        .arg("not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse album"));
}

#[test]
fn test_binary_rejects_unknown_config_key() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "turbo = true\n").unwrap();

    soundtrack_dl(&home)
        .arg("https://example.com/album")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_album_page_404_fails() -> Result<(), Box<dyn std::error::Error>> {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = TempDir::new()?;
    let out = home.path().join("out");
    soundtrack_dl(&home)
        .arg(format!("{}/game-soundtracks/album/missing", server.uri()))
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"))
        .stdout(predicate::str::contains("Download complete.").not());

    assert!(!out.exists(), "no directory is created when discovery fails");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_downloads_album() -> Result<(), Box<dyn std::error::Error>> {
    let server = require_mock_server!();
    let html = |body: &str| {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
    };
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/cli"))
        .respond_with(html(
            r#"<table id="songlist">
            <tr><td><a href="/game-soundtracks/album/cli/01">Main Theme</a></td></tr>
            <tr><td><a href="/game-soundtracks/album/cli/02">Gone Track</a></td></tr>
            </table>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/cli/01"))
        .respond_with(html(r#"<a href="/soundtracks/cli/01.mp3">Download</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/cli/02"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/soundtracks/cli/01.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"mp3".to_vec(), "audio/mpeg"))
        .mount(&server)
        .await;

    let home = TempDir::new()?;
    let out = home.path().join("nested").join("out");
    soundtrack_dl(&home)
        .arg(format!("{}/game-soundtracks/album/cli", server.uri()))
        .args(["--pause-ms", "0", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Download complete."));

    assert_eq!(std::fs::read(out.join("Main_Theme.mp3"))?, b"mp3");
    assert!(!out.join("Gone_Track.mp3").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_uses_config_file_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/cfg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<table id="songlist"><tr><td><a href="/s/1">Intro</a></td></tr></table>"#.to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<a href="/soundtracks/cfg/1.ogg">dl</a>"#.to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/soundtracks/cfg/1.ogg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ogg".to_vec(), "audio/ogg"))
        .mount(&server)
        .await;

    let home = TempDir::new()?;
    let out = home.path().join("from-config");
    let config_dir = home.path().join("soundtrack-dl");
    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "output_dir = \"{}\"\nextension = \".ogg\"\npause_ms = 0\nverbosity = \"quiet\"\n",
            out.display()
        ),
    )?;

    soundtrack_dl(&home)
        .arg(format!("{}/game-soundtracks/album/cfg", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Download complete."));

    assert_eq!(std::fs::read(out.join("Intro.ogg"))?, b"ogg");
    Ok(())
}

//! Loading the database over HTTP through the on-disk cache

mod helper;

use clap::Parser;
use mockito::Server;
use pyversion_info::cli::{self, Cli};
use pyversion_info::config::Config;
use tempfile::TempDir;

use helper::{fixture_path, load_fixture};

#[tokio::test]
async fn second_load_is_served_from_cache() {
    // 1. Serve the fixture once
    let body = std::fs::read_to_string(fixture_path()).unwrap();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/pyversion-info-data.v1.json")
        .with_status(200)
        .with_header("cache-control", "max-age=3600")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    // 2. Load twice with the same cache directory
    let cache_dir = TempDir::new().unwrap();
    let url = format!("{}/pyversion-info-data.v1.json", server.url());
    let cli = Cli::try_parse_from([
        "pyversion-info",
        "-d",
        url.as_str(),
        "--cache-dir",
        cache_dir.path().to_str().unwrap(),
        "list",
        "major",
    ])
    .unwrap();

    let first = cli::load_database(&cli, &Config::default()).await.unwrap();
    let second = cli::load_database(&cli, &Config::default()).await.unwrap();

    // 3. Only one request reached the server
    mock.assert_async().await;
    assert_eq!(first, load_fixture());
    assert_eq!(second, first);
    assert!(cache_dir.path().join("http-cache.db").exists());
}

#[tokio::test]
async fn no_cache_always_hits_the_network() {
    let body = std::fs::read_to_string(fixture_path()).unwrap();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/data.json")
        .with_status(200)
        .with_header("cache-control", "max-age=3600")
        .with_body(body)
        .expect(2)
        .create_async()
        .await;

    let cache_dir = TempDir::new().unwrap();
    let url = format!("{}/data.json", server.url());
    let cli = Cli::try_parse_from([
        "pyversion-info",
        "--no-cache",
        "--cache-dir",
        cache_dir.path().to_str().unwrap(),
        "-d",
        url.as_str(),
        "list",
        "major",
    ])
    .unwrap();

    cli::load_database(&cli, &Config::default()).await.unwrap();
    cli::load_database(&cli, &Config::default()).await.unwrap();

    mock.assert_async().await;
    assert!(!cache_dir.path().join("http-cache.db").exists());
}

#[tokio::test]
async fn server_errors_fail_the_load() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/data.json")
        .with_status(500)
        .create_async()
        .await;

    let url = format!("{}/data.json", server.url());
    let cli = Cli::try_parse_from(["pyversion-info", "--no-cache", "-d", url.as_str(), "list", "major"])
        .unwrap();

    let err = cli::load_database(&cli, &Config::default()).await.unwrap_err();
    assert!(err.to_string().contains("returned status 500"), "{err}");
}

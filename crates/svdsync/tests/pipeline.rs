use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use bytes::Bytes;
use svdsync::{Config, RunOptions, Stage, SyncError, Syncer};
use svdsync_fetch::{BoxStream, HttpClient};
use zip::write::SimpleFileOptions;

const CATALOG_URL: &str = "https://vendor.test/catalog.json";

#[derive(Debug, thiserror::Error)]
#[error("HTTP status {0}")]
struct StatusError(u16);

#[derive(Default)]
struct MemoryClient {
    routes: HashMap<String, Vec<u8>>,
}

impl MemoryClient {
    fn route(mut self, url: &str, body: Vec<u8>) -> Self {
        self.routes.insert(url.to_string(), body);
        self
    }
}

impl HttpClient for MemoryClient {
    type Error = StatusError;

    async fn stream(
        &self,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
        let body = self.routes.get(url).cloned().ok_or(StatusError(404))?;
        Ok(Box::pin(futures_util::stream::iter(vec![Ok(Bytes::from(body))])))
    }
}

fn zip_bytes(members: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn catalog(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let rows: Vec<String> = rows
        .iter()
        .map(|(description, version, link)| {
            format!(
                r#"{{"localizedDescriptions": {{"en": "{description}"}}, "version": "{version}", "localizedLinks": {{"en": "{link}"}}}}"#
            )
        })
        .collect();
    format!(r#"{{"rows": [{}]}}"#, rows.join(",")).into_bytes()
}

fn config() -> Config {
    Config {
        catalog_url: CATALOG_URL.to_string(),
        origin: "https://vendor.test".to_string(),
        ..Config::default()
    }
}

fn two_family_client() -> MemoryClient {
    MemoryClient::default()
        .route(
            CATALOG_URL,
            catalog(&[
                ("stm32l0 SVD files", "3.0", "/l0.zip"),
                ("Stm32f4 SVD files", "1.2", "/f4.zip"),
            ]),
        )
        .route(
            "https://vendor.test/f4.zip",
            zip_bytes(&[
                ("STM32F4_svd/STM32F401.svd", "<device>  \r\n</device>\r\n"),
                ("STM32F4_svd/STM32F405.svd", "<device/>"),
                ("STM32F4_svd/notes.txt", "ignored"),
            ]),
        )
        .route(
            "https://vendor.test/l0.zip",
            zip_bytes(&[("STM32L0x1.svd", "<device>\t\r</device>")]),
        )
}

fn write_readme(root: &Path) {
    fs::write(
        root.join("README.md"),
        "# STM32 SVD\n\n<!--families-->\n- Stale: v0\n<!--/families-->\n\nLicense notes.\n",
    )
    .unwrap();
}

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (e.file_name().to_string_lossy().into_owned(), fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn full_run_lays_out_families_and_index() {
    let root = tempfile::tempdir().unwrap();
    write_readme(root.path());

    let syncer = Syncer::new(two_family_client(), config(), root.path());
    let report = syncer
        .run(RunOptions {
            download: true,
            commit: false,
        })
        .await
        .unwrap();

    assert_eq!(
        report.stages,
        vec![
            Stage::Start,
            Stage::CatalogResolved,
            Stage::Fetched,
            Stage::Normalized,
            Stage::IndexUpdated,
            Stage::Done
        ]
    );
    assert!(report.commit.is_none());

    let f4 = snapshot(&root.path().join("stm32f4"));
    assert_eq!(
        f4,
        vec![
            ("STM32F401.svd".to_string(), b"<device>\n</device>\n".to_vec()),
            ("STM32F405.svd".to_string(), b"<device/>\n".to_vec()),
        ]
    );
    let l0 = snapshot(&root.path().join("stm32l0"));
    assert_eq!(l0, vec![("STM32L0x1.svd".to_string(), b"<device>\n</device>\n".to_vec())]);

    assert!(root.path().join("raw/stm32f4.zip").is_file());
    assert!(root.path().join("raw/stm32l0.zip").is_file());
    assert!(root.path().join("raw/stm32f4/STM32F4_svd/notes.txt").is_file());

    assert_eq!(
        fs::read_to_string(root.path().join("README.md")).unwrap(),
        "# STM32 SVD\n\n<!--families-->\n- Stm32f4: v1.2\n- stm32l0: v3.0\n<!--/families-->\n\nLicense notes.\n"
    );
}

#[tokio::test]
async fn rerun_without_download_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    write_readme(root.path());

    let syncer = Syncer::new(two_family_client(), config(), root.path());
    syncer
        .run(RunOptions {
            download: true,
            commit: false,
        })
        .await
        .unwrap();
    let first = (
        snapshot(&root.path().join("stm32f4")),
        snapshot(&root.path().join("stm32l0")),
        fs::read(root.path().join("README.md")).unwrap(),
    );

    // Only the catalog is reachable now; archives come from raw/.
    let offline = MemoryClient::default().route(
        CATALOG_URL,
        catalog(&[
            ("stm32l0 SVD files", "3.0", "/l0.zip"),
            ("Stm32f4 SVD files", "1.2", "/f4.zip"),
        ]),
    );
    let report = Syncer::new(offline, config(), root.path())
        .run(RunOptions::default())
        .await
        .unwrap();
    assert!(!report.stages.contains(&Stage::Fetched));

    let second = (
        snapshot(&root.path().join("stm32f4")),
        snapshot(&root.path().join("stm32l0")),
        fs::read(root.path().join("README.md")).unwrap(),
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn unreachable_catalog_touches_nothing() {
    let root = tempfile::tempdir().unwrap();
    write_readme(root.path());
    let before = fs::read(root.path().join("README.md")).unwrap();

    let result = Syncer::new(MemoryClient::default(), config(), root.path())
        .run(RunOptions {
            download: true,
            commit: true,
        })
        .await;

    assert!(matches!(result, Err(SyncError::CatalogFetch { .. })));
    assert!(!root.path().join("raw").exists());
    assert_eq!(fs::read(root.path().join("README.md")).unwrap(), before);
}

#[tokio::test]
async fn failed_archive_download_names_the_family() {
    let root = tempfile::tempdir().unwrap();
    write_readme(root.path());

    let client = MemoryClient::default()
        .route(CATALOG_URL, catalog(&[("STM32G4 SVD", "1.0", "/g4.zip")]));
    let result = Syncer::new(client, config(), root.path())
        .run(RunOptions {
            download: true,
            commit: false,
        })
        .await;

    match result {
        Err(SyncError::ArchiveFetch { family, .. }) => assert_eq!(family, "STM32G4"),
        other => panic!("expected archive fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_staged_archive_is_an_archive_error() {
    let root = tempfile::tempdir().unwrap();
    write_readme(root.path());

    let client = MemoryClient::default()
        .route(CATALOG_URL, catalog(&[("STM32WB SVD", "1.1", "/wb.zip")]));
    let result = Syncer::new(client, config(), root.path())
        .run(RunOptions::default())
        .await;

    assert!(matches!(result, Err(SyncError::ArchiveFormat { family, .. }) if family == "STM32WB"));
}

#[tokio::test]
async fn readme_without_markers_is_reported() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("README.md"), "no block\n").unwrap();

    let result = Syncer::new(two_family_client(), config(), root.path())
        .run(RunOptions {
            download: true,
            commit: false,
        })
        .await;

    assert!(matches!(result, Err(SyncError::IndexUpdate(_))));
    assert_eq!(fs::read_to_string(root.path().join("README.md")).unwrap(), "no block\n");
}

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::data::FetchOptions;
use crate::error::{FetchError, Result};
use crate::http::HttpClient;

pub struct Fetcher<C: HttpClient> {
    client: C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    fn network_error<E: std::error::Error>(url: &str, e: E) -> FetchError {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }

    /// Download `url` completely into memory.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let mut stream = self
            .client
            .stream(url, &self.options.headers)
            .await
            .map_err(|e| Self::network_error(url, e))?;

        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::network_error(url, e))?;
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// Any existing file at `destination` is removed before the request is
    /// made. The body is streamed into a private temporary file next to
    /// `destination` and renamed into place only once it is complete.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        if destination.is_dir() {
            return Err(FetchError::DestinationIsDirectory(destination.to_path_buf()));
        }
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.is_dir() {
            return Err(FetchError::MissingParent(parent));
        }

        svdsync_fs::remove_file_if_exists(destination)?;

        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(FetchError::TempFile)?;
        let io_error = |source| FetchError::Io {
            path: staging.path().to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::from_std(staging.reopen().map_err(io_error)?);

        info!(url, destination = %destination.display(), "downloading");
        let mut stream = self
            .client
            .stream(url, &self.options.headers)
            .await
            .map_err(|e| Self::network_error(url, e))?;

        let mut bytes_downloaded = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::network_error(url, e))?;
            file.write_all(&chunk).await.map_err(io_error)?;
            bytes_downloaded += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        staging.persist(destination).map_err(|e| FetchError::Persist {
            path: destination.to_path_buf(),
            source: e.error,
        })?;

        debug!(url, bytes = bytes_downloaded, "download placed");
        Ok(bytes_downloaded)
    }
}

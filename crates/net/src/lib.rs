#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for artsync
//!
//! This crate handles all HTTP operations: the header probe used by package
//! validation and the streaming artifact download. There is deliberately no
//! retry layer; a failed call is the caller's to record.

mod client;

pub use client::{NetClient, NetConfig};

use artsync_errors::{Error, NetworkError};
use artsync_events::{Event, EventSender, EventSenderExt};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Fetch the content type a URL reports, without consuming the body
///
/// Returns `None` when the server does not send a `content-type` header.
/// Any parameters on the header value (`; charset=...`) are stripped.
///
/// # Errors
///
/// Returns an error if the request fails or the server returns an error
/// status.
pub async fn probe_content_type(
    client: &NetClient,
    url: &str,
    tx: &EventSender,
) -> Result<Option<String>, Error> {
    tx.emit(Event::DebugLog {
        message: format!("Probing content type of {url}"),
    });

    let response = client.get(url).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    Ok(response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or(value)
                .trim()
                .to_string()
        }))
}

/// Download a URL to a local file, streaming the body
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the request fails, the server returns an error
/// status, or the file cannot be written.
pub async fn download_to_file(
    client: &NetClient,
    url: &str,
    dest: &Path,
    tx: &EventSender,
) -> Result<u64, Error> {
    tx.emit(Event::DebugLog {
        message: format!("Downloading {url} to {}", dest.display()),
    });

    let response = client.get(url).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

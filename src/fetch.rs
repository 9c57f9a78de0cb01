//! Archive download
//!
//! Builds the release archive URL for a version and platform, then streams
//! the archive to disk under the file name the releases server reports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use tracing::{debug, info};

use crate::error::fs::write_failed;
use crate::error::http::protocol;
use crate::error::{Result, SetupError};
use crate::host::HostOs;
use crate::progress::DownloadProgress;
use crate::version::VersionSpec;

/// A downloaded release archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArchive {
    pub local_path: PathBuf,
    pub source_url: String,
}

/// Release archive URL for `version` on `os`.
///
/// The major-6 layout ships a single platform-independent zip.
pub fn archive_url(releases: &str, version: &VersionSpec, os: HostOs, legacy: bool) -> String {
    let base = releases.trim_end_matches('/');
    let suffix = if legacy { ".zip" } else { os.archive_suffix() };
    format!(
        "{base}/artifactory-pro/org/artifactory/pro/jfrog-artifactory-pro/{version}/jfrog-artifactory-pro-{version}{suffix}"
    )
}

/// Extract the `filename` parameter of a `Content-Disposition` header value.
///
/// Accepts quoted and bare values and the RFC 5987 `filename*` form, which
/// wins when both are present. Only the final path component is kept.
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim();
        match key.as_str() {
            "filename" => plain = Some(unquote(raw)),
            "filename*" => extended = decode_extended(raw),
            _ => {}
        }
    }

    let name = extended.or(plain)?;
    let name = Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)?;
    (!name.is_empty() && name != "..").then_some(name)
}

/// Split on `;` outside of quoted strings
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (index, ch) in value.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                unquoted.push(next);
            }
        } else {
            unquoted.push(ch);
        }
    }
    unquoted
}

/// Decode `charset'language'percent-encoded-value`
fn decode_extended(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let charset = parts.next()?.to_ascii_lowercase();
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if charset != "utf-8" && charset != "us-ascii" {
        return None;
    }
    urlencoding::decode(encoded).ok().map(|decoded| decoded.into_owned())
}

/// HTTP client for the releases server. Archives are large, so no overall
/// request timeout is set.
pub fn download_client() -> Result<Client> {
    Ok(Client::builder().timeout(None::<Duration>).build()?)
}

/// Download the archive at `url` into `dest_dir`
pub fn download(client: &Client, url: &str, dest_dir: &Path) -> Result<DownloadedArchive> {
    info!("Downloading Artifactory from URL: {url}");

    let response = client
        .get(url)
        .send()
        .map_err(|e| crate::error::http::transport(format!("failed getting archive: {e}")))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(SetupError::Download {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let header = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .ok_or_else(|| protocol("releases response has no Content-Disposition header"))?;
    let header = header
        .to_str()
        .map_err(|_| protocol("Content-Disposition header is not valid ASCII"))?;
    let filename = filename_from_content_disposition(header)
        .ok_or_else(|| protocol(format!("no file name in Content-Disposition '{header}'")))?;
    info!("Extracted archive name from response: {filename}");

    let total = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let local_path = dest_dir.join(&filename);
    let progress = DownloadProgress::new(total);
    progress.set_name(&filename);

    match write_body(response, &local_path, &progress) {
        Ok(bytes) => {
            progress.finish();
            debug!(bytes, path = %local_path.display(), "archive written");
            Ok(DownloadedArchive {
                local_path,
                source_url: url.to_string(),
            })
        }
        Err(err) => {
            progress.abandon();
            Err(err)
        }
    }
}

fn write_body(
    response: reqwest::blocking::Response,
    path: &Path,
    progress: &DownloadProgress,
) -> Result<u64> {
    let file = File::create(path).map_err(|e| write_failed(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut reader = progress.wrap(response);

    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| write_failed(path, e))?;
    writer.flush().map_err(|e| write_failed(path, e))?;
    writer
        .into_inner()
        .map_err(|e| write_failed(path, e.error()))?
        .sync_all()
        .map_err(|e| write_failed(path, e))?;

    Ok(bytes)
}

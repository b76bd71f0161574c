use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, Response, StatusCode};
use hyper::Body;
use percent_encoding::percent_decode_str;
use tokio::fs;
use tracing::debug;

use crate::proxy::http::config::FsConfig;

/// serve answers a module/asset request from the configured root, applying
/// alias resolution to the decoded specifier first. Directories fall back to
/// their `index.html`.
pub async fn serve(
    fs_config: &FsConfig,
    method: &Method,
    raw_path: &str,
) -> Result<Response<Body>> {
    if method != Method::GET && method != Method::HEAD {
        return status_response(StatusCode::METHOD_NOT_ALLOWED);
    }

    // Decode exactly once; a second pass would reopen the traversal check.
    let decoded = match percent_decode_str(raw_path).decode_utf8() {
        Ok(cow) => cow.into_owned(),
        Err(_) => return status_response(StatusCode::BAD_REQUEST),
    };
    let specifier = decoded.trim_start_matches('/');

    if !contained(specifier) {
        debug!("rejected module path {:?}", decoded);
        return status_response(StatusCode::FORBIDDEN);
    }

    let candidate = match fs_config.resolver.resolve(specifier) {
        Some(path) => path,
        None => fs_config.root.join(specifier),
    };

    let (path, metadata) = match locate(candidate).await {
        Some(found) => found,
        None => {
            debug!("no file for module path {:?}", decoded);
            return status_response(StatusCode::NOT_FOUND);
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mime.as_ref())
        .header(CONTENT_LENGTH, metadata.len());

    if method == Method::HEAD {
        return Ok(builder.body(Body::empty())?);
    }
    match fs::read(&path).await {
        Ok(contents) => Ok(builder.body(Body::from(contents))?),
        Err(_) => status_response(StatusCode::NOT_FOUND),
    }
}

async fn locate(candidate: PathBuf) -> Option<(PathBuf, std::fs::Metadata)> {
    let metadata = fs::metadata(&candidate).await.ok()?;
    if metadata.is_dir() {
        let index = candidate.join("index.html");
        let metadata = fs::metadata(&index).await.ok()?;
        return if metadata.is_file() {
            Some((index, metadata))
        } else {
            None
        };
    }
    if metadata.is_file() {
        Some((candidate, metadata))
    } else {
        None
    }
}

/// Only plain and current-dir components may remain after decoding;
/// parent-dir and rooted components would escape the serving root.
fn contained(specifier: &str) -> bool {
    Path::new(specifier)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

fn status_response(status: StatusCode) -> Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .body(Body::from(status.canonical_reason().unwrap_or("")))?)
}

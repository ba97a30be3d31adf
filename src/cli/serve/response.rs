//! HTTP response handlers.
//!
//! HEAD responses go through the same handlers: tiny_http keeps the
//! headers and drops the body.

use std::{fs::File, path::Path};

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime::{self, types::PLAIN};

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let response = Response::from_file(file).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

/// Respond with a plain-text 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_text(request, 404, "404 Not Found", None)
}

/// Respond to anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_text(
        request,
        405,
        "405 Method Not Allowed",
        Some(make_header("Allow", "GET, HEAD")?),
    )
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_text(request, 503, "503 Service Unavailable", None)
}

fn send_text(request: Request, status: u16, body: &str, extra: Option<Header>) -> Result<()> {
    let mut response = Response::from_data(body.as_bytes().to_vec())
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?);
    if let Some(header) = extra {
        response = response.with_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}

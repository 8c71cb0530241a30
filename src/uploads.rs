//! Floorplan and 3D-layout uploads.
//!
//! One-shot requests, independent of the poll loops. After a successful
//! upload the caller gets a cache-busted URL for the new background image.

use crate::error::{DashboardError, Result};
use crate::gateway::HttpGateway;
use crate::protocol::{routes, UploadResponse};
use log::info;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Floorplan,
    Layout3d,
}

impl UploadTarget {
    pub fn route(self) -> &'static str {
        match self {
            UploadTarget::Floorplan => routes::UPLOAD_FLOORPLAN,
            UploadTarget::Layout3d => routes::UPLOAD_3D,
        }
    }

    /// Image resource that changes when this target is uploaded.
    pub fn image_path(self) -> &'static str {
        match self {
            UploadTarget::Floorplan => routes::FLOORPLAN_IMAGE,
            UploadTarget::Layout3d => routes::BUILDING_3D_IMAGE,
        }
    }
}

/// Reject uploads the backend would refuse, before any bytes are sent.
///
/// Returns the MIME type to send with the file.
pub fn validate_upload(file_name: &str) -> Result<&'static str> {
    if file_name.trim().is_empty() {
        return Err(DashboardError::InvalidUpload("Empty filename".into()));
    }
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(DashboardError::InvalidUpload(format!(
            "Please upload a PNG or JPG image (got '{}')",
            file_name
        )));
    }
    Ok(if ext == "png" { "image/png" } else { "image/jpeg" })
}

/// `<base>/<image>?t=<millis>` so clients re-fetch the replaced image.
pub fn cache_busted_url(base_url: &str, target: UploadTarget, unix_millis: u128) -> String {
    format!(
        "{}{}?t={}",
        base_url.trim_end_matches('/'),
        target.image_path(),
        unix_millis
    )
}

/// Upload the image at `path` to `target`.
pub async fn upload(gateway: &HttpGateway, target: UploadTarget, path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let mime = validate_upload(&file_name)?;
    let data = tokio::fs::read(path).await?;

    info!(
        "Uploading {} ({} bytes) to {}",
        file_name,
        data.len(),
        target.route()
    );

    let part = reqwest::multipart::Part::bytes(data)
        .file_name(file_name)
        .mime_str(mime)?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = gateway
        .http()
        .post(gateway.url(target.route()))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;
    // Error bodies carry a message even on 4xx; prefer it over the status.
    let parsed: Option<UploadResponse> = serde_json::from_slice(&body).ok();
    if let Some(message) = parsed.and_then(|r| r.error) {
        return Err(DashboardError::Rejected(message));
    }
    if !status.is_success() {
        return Err(DashboardError::Status {
            route: target.route().to_string(),
            status: status.as_u16(),
        });
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    Ok(cache_busted_url(gateway.base_url(), target, millis))
}

pub async fn upload_floorplan(gateway: &HttpGateway, path: &Path) -> Result<String> {
    upload(gateway, UploadTarget::Floorplan, path).await
}

pub async fn upload_3d(gateway: &HttpGateway, path: &Path) -> Result<String> {
    upload(gateway, UploadTarget::Layout3d, path).await
}

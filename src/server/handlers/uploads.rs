//! Image upload and serving handlers.
//!
//! Uploaded images land in the data directory under a random filename that
//! keeps the original extension; the returned URL is what clients attach to
//! image messages.

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Multipart;

use crate::server::config::MAX_UPLOAD_SIZE;
use crate::server::state::ChatState;
use crate::server::utils::api_error;
use crate::storage::generate_id;

/// File extension from an uploaded filename, restricted to simple
/// alphanumeric extensions so nothing surprising ends up in the URL.
fn safe_extension(filename: &str) -> Option<&str> {
    let ext = filename.rsplit_once('.')?.1;
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}

fn content_type_for(filename: &str) -> &'static str {
    match safe_extension(filename).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub async fn upload_image_handler(
    State(state): State<ChatState>,
    mut multipart: Multipart,
) -> Response {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            filename = field.file_name().map(|f| f.to_string());
            match field.bytes().await {
                Ok(bytes) => {
                    if bytes.len() as u64 > MAX_UPLOAD_SIZE {
                        return api_error(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            format!("upload exceeds maximum size of {} bytes", MAX_UPLOAD_SIZE),
                        );
                    }
                    file_data = Some(bytes.to_vec());
                }
                Err(e) => {
                    return api_error(StatusCode::BAD_REQUEST, format!("failed to read file: {e}"))
                }
            }
        }
    }

    let data = match file_data {
        Some(d) if !d.is_empty() => d,
        _ => return api_error(StatusCode::BAD_REQUEST, "no file uploaded"),
    };

    let stored_name = match filename.as_deref().and_then(safe_extension) {
        Some(ext) => format!("{}.{}", generate_id(), ext),
        None => generate_id(),
    };
    let path = state.upload_dir.join(&stored_name);
    if let Err(e) = tokio::fs::write(&path, &data).await {
        return api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to store upload: {e}"),
        );
    }

    let json = serde_json::json!({ "url": format!("/uploads/{stored_name}") });
    (StatusCode::OK, axum::Json(json)).into_response()
}

pub async fn serve_upload_handler(
    State(state): State<ChatState>,
    UrlPath(filename): UrlPath<String>,
) -> Response {
    // Reject anything that could escape the upload directory.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return api_error(StatusCode::BAD_REQUEST, "invalid filename");
    }

    let path = state.upload_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&filename))],
            data,
        )
            .into_response(),
        Err(_) => api_error(StatusCode::NOT_FOUND, "file not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_extension() {
        assert_eq!(safe_extension("photo.png"), Some("png"));
        assert_eq!(safe_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(safe_extension("noext"), None);
        assert_eq!(safe_extension("weird.p/ng"), None);
        assert_eq!(safe_extension("dot."), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("b.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("c.bin"), "application/octet-stream");
    }
}

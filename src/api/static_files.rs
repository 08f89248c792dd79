use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use mime_guess::from_path;
use rust_embed::RustEmbed;
use std::path::{Component, Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "frontend/dist"]
pub struct Assets;

/// Serve static files from the filesystem or embedded assets
pub async fn serve_static(uri: Uri, static_dir: Option<String>) -> Response {
    let path = uri.path().trim_start_matches('/');

    // Try to serve from filesystem if static_dir is provided
    if let Some(ref dir) = static_dir {
        if let Some(file_path) = resolve_in_dir(dir, path) {
            if let Ok(content) = tokio::fs::read(&file_path).await {
                let mime_type = from_path(&file_path).first_or_octet_stream();
                return file_response(mime_type.as_ref(), Body::from(content));
            }
        }
    }

    // Fall back to embedded assets
    serve_embedded(path)
}

/// Serve from embedded assets
fn serve_embedded(path: &str) -> Response {
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = from_path(path).first_or_octet_stream();
            file_response(mime.as_ref(), Body::from(content.data))
        }
        None => {
            // Unknown page routes get the index
            if !path.contains('.') {
                if let Some(index) = Assets::get("index.html") {
                    return file_response("text/html", Body::from(index.data));
                }
            }
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}

/// Join a request path onto the static dir, refusing anything that escapes it
fn resolve_in_dir(dir: &str, path: &str) -> Option<PathBuf> {
    let path = if path.is_empty() { "index.html" } else { path };
    let relative = Path::new(path);

    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(PathBuf::from(dir).join(relative))
    } else {
        None
    }
}

fn file_response(content_type: &str, body: Body) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        body,
    )
        .into_response()
}

//! Static file serving for the overlay page (web/dist).

use axum::extract::Path;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "../web/dist/"]
struct OverlayAssets;

pub async fn overlay_handler(Path(path): Path<String>) -> Response {
    serve_embedded::<OverlayAssets>(&path)
}

pub async fn overlay_index() -> Response {
    serve_embedded::<OverlayAssets>("index.html")
}

/// Fallback handler: unknown API paths get JSON, everything else gets the page.
/// Uses `Uri` instead of `Path` because fallback has no capture parameter.
pub async fn overlay_fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if should_return_non_spa_not_found(request_path) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": request_path,
            })),
        )
            .into_response();
    }

    serve_embedded::<OverlayAssets>(request_path.trim_start_matches('/'))
}

fn should_return_non_spa_not_found(path: &str) -> bool {
    const NON_SPA_PREFIXES: [&str; 2] = ["/api", "/ws"];

    NON_SPA_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn serve_embedded<E: Embed>(path: &str) -> Response {
    let (asset, served_path) = match E::get(path) {
        Some(asset) => (Some(asset), path),
        None => (E::get("index.html"), "index.html"),
    };

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(served_path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

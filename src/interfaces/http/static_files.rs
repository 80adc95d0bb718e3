use std::path::{Component, Path, PathBuf};

use crate::domain::error::{AppError, Result};

/// Resolve a request path to a file inside the web root.
///
/// The resolved path must stay inside the root after canonicalization;
/// anything escaping it is rejected. `/` maps to `index.html`.
pub fn resolve_static_asset(web_root: &Path, request_path: &str) -> Result<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let candidate = Path::new(relative);
    if candidate
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(AppError::Forbidden(format!(
            "Path '{}' escapes the asset root",
            request_path
        )));
    }

    let root = web_root.canonicalize().map_err(|_| {
        AppError::NotFound(format!("Asset root {} does not exist", web_root.display()))
    })?;
    let resolved = root
        .join(candidate)
        .canonicalize()
        .map_err(|_| AppError::NotFound(format!("Asset '{}' not found", relative)))?;

    if !resolved.starts_with(&root) {
        return Err(AppError::Forbidden(format!(
            "Path '{}' escapes the asset root",
            request_path
        )));
    }
    if !resolved.is_file() {
        return Err(AppError::NotFound(format!("Asset '{}' not found", relative)));
    }

    Ok(resolved)
}

/// Content type by file extension; unknown extensions are served as an
/// opaque byte stream.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "csv" => "text/csv; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

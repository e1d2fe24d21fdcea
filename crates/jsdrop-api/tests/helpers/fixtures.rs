//! Test fixtures: bundle bodies and multipart parts.

use axum_test::multipart::{MultipartForm, Part};

pub const MB: usize = 1_000_000;

/// A JavaScript body of exactly `len` bytes.
pub fn js_bundle(len: usize) -> Vec<u8> {
    let line = b"console.log('jsdrop');\n";
    line.iter().copied().cycle().take(len).collect()
}

pub fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

/// Form with one file under `JSUpload`.
pub fn upload_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part("JSUpload", file_part(data, file_name, mime_type))
}

/// Numeric suffix of a key shaped `{basename}-{millis}{extension}`.
pub fn key_millis(key: &str, basename: &str, extension: &str) -> i64 {
    key.strip_prefix(&format!("{}-", basename))
        .and_then(|rest| rest.strip_suffix(extension))
        .and_then(|millis| millis.parse().ok())
        .unwrap_or_else(|| panic!("Unexpected key shape: {}", key))
}

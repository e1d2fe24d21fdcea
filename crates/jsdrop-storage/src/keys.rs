//! Storage key generation shared by all backends.
//!
//! Key format: `{basename}-{receipt_millis}{extension}`. The key is derived from
//! the client-supplied filename and the wall-clock instant the upload was
//! received. Two uploads of the same name get distinct keys as long as they are
//! received in different milliseconds; backends refuse to overwrite, so a
//! same-millisecond collision surfaces as a storage error instead of data loss.

use chrono::{DateTime, Utc};
use jsdrop_core::StorageKey;

const FALLBACK_BASENAME: &str = "upload";

/// Split a client filename into (basename, extension).
///
/// Directory components are dropped, whichever separator the client used. The
/// extension keeps its dot and case; a name whose only dot is the leading one
/// (`.babelrc`) has no extension.
fn split_filename(original_name: &str) -> (&str, &str) {
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    }
}

/// Generate the storage key for a file received at `received_at`.
pub fn generate_storage_key(original_name: &str, received_at: DateTime<Utc>) -> StorageKey {
    let (basename, extension) = split_filename(original_name);
    let basename = if basename.is_empty() {
        FALLBACK_BASENAME
    } else {
        basename
    };

    StorageKey::new(format!(
        "{}-{}{}",
        basename,
        received_at.timestamp_millis(),
        extension
    ))
}

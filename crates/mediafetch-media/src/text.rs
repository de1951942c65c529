//! Text derivation from probed metadata.

use crate::probe::MediaMetadata;

/// Returned when neither a title nor a description is available.
pub const NO_TEXT_PLACEHOLDER: &str =
    "(No usable text was retrieved. Retry later or use the video/audio only.)";

/// Title and description joined by a blank line, or the placeholder.
pub fn derive_text(meta: &MediaMetadata) -> String {
    let parts: Vec<&str> = [meta.title(), meta.description()]
        .into_iter()
        .flatten()
        .collect();

    let text = parts.join("\n\n").trim().to_string();
    if text.is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        text
    }
}

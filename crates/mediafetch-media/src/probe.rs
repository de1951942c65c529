//! yt-dlp metadata probing.
//!
//! `yt-dlp -J <url>` prints one JSON document describing the media. Only the
//! handful of fields the fetch pipeline needs are modelled; everything else is
//! ignored.

use serde::{Deserialize, Deserializer};

use mediafetch_models::MediaDimensions;

use crate::error::MediaResult;

/// Output ceiling for the metadata probe (20 MiB).
pub const METADATA_MAX_OUTPUT_BYTES: usize = 20 * 1024 * 1024;

/// Media metadata reported by yt-dlp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaMetadata {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fulltitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
    /// Formats yt-dlp selected for download (video and audio parts)
    #[serde(default)]
    pub requested_formats: Option<Vec<FormatInfo>>,
}

/// One entry of `requested_formats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatInfo {
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
}

impl MediaMetadata {
    /// Parse the JSON printed by `yt-dlp -J`.
    pub fn parse(json: &str) -> MediaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    /// Description, falling back to the full title.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description).or_else(|| non_empty(&self.fulltitle))
    }

    /// Width/height, taken from the top level and otherwise from the first
    /// requested format.
    pub fn dimensions(&self) -> MediaDimensions {
        let first = self
            .requested_formats
            .as_deref()
            .and_then(|formats| formats.first());

        MediaDimensions {
            width: self.width.or_else(|| first.and_then(|f| f.width)),
            height: self.height.or_else(|| first.and_then(|f| f.height)),
        }
    }
}

/// Arguments for a metadata-only probe.
pub fn metadata_args(url: &str) -> Vec<String> {
    vec!["-J".to_string(), url.to_string()]
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Accept strings as-is and render numbers and `true` as text; anything else
/// (including `0` and `false`) is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        serde_json::Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }))
}

/// Accept integers or floats; zero, negatives and non-numbers become `None`.
fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f > 0.0).map(|f| f.round() as u64))
        })
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0))
}

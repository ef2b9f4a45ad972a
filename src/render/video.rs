use once_cell::sync::Lazy;
use regex::Regex;

static RE_YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .unwrap()
});

/// Extracts the 11-character video id from a YouTube URL.
///
/// Values that match no known URL shape are returned unchanged, so a bare id
/// works as well.
pub fn video_id(value: &str) -> &str {
    RE_YOUTUBE_ID
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map_or(value, |id| id.as_str())
}

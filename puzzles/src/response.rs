//! Response text cleaning shared by the scorers.

/// Chat-transcript marker separating the prompt from the model's turn.
const ROLE_MARKER: &str = "assistant\n";

/// Lowercase, trim, and drop everything up to the chat role marker.
///
/// Responses captured from a chat transcript carry the prompt before the
/// model's turn; only text after the first `assistant\n` marker should be
/// scored. When the marker is absent the whole string is kept, so plain
/// completions score the same as transcripts.
pub fn clean_response(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim();
    match trimmed.find(ROLE_MARKER) {
        Some(pos) => trimmed[pos + ROLE_MARKER.len()..].trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Fraction of `markers` that occur exactly once in `text`.
///
/// Duplicated and missing markers both count against the share.
pub fn unique_marker_share(text: &str, markers: &[&str]) -> f64 {
    if markers.is_empty() {
        return 0.0;
    }
    let unique = markers
        .iter()
        .filter(|marker| text.matches(*marker).count() == 1)
        .count();
    unique as f64 / markers.len() as f64
}

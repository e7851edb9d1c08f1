//! Input validation for user ids, channel names and free-form command arguments

use crate::fishing::errors::FishingError;

/// Longest accepted user id, in characters.
pub const MAX_USER_ID_CHARS: usize = 64;

/// Longest accepted channel name, in characters.
pub const MAX_CHANNEL_CHARS: usize = 32;

/// Longest preview kept by [`escape_for_log`].
const MAX_LOG_PREVIEW: usize = 120;

/// Normalize a caller-supplied user id.
///
/// Surrounding whitespace is trimmed. A missing or blank id, one containing control
/// characters, or one longer than [`MAX_USER_ID_CHARS`] is rejected with
/// [`FishingError::InvalidUser`]. No id is ever invented on the caller's behalf.
pub fn normalize_user_id(raw: Option<&str>) -> Result<String, FishingError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FishingError::InvalidUser);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(FishingError::InvalidUser);
    }
    if trimmed.chars().count() > MAX_USER_ID_CHARS {
        return Err(FishingError::InvalidUser);
    }
    Ok(trimmed.to_string())
}

/// Normalize a channel name: trimmed, lowercased, `None` when unusable.
pub fn normalize_channel(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CHANNEL_CHARS {
        return None;
    }
    if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Escape a string for single-line logging.
///
/// Newlines, carriage returns, tabs and backslashes are escaped, other control
/// characters become `\xNN`, and long input is cut with an ellipsis.
pub fn escape_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_LOG_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_LOG_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

//! Participant identifier rules.
//!
//! Generated identifiers have the form `DG-<study_id>-<seq>` where `seq` is
//! zero-padded to four digits. Sequence allocation itself is transactional
//! and lives in `rct-db`; this module only formats, parses, and checks codes.

use crate::errors::CoreError;

/// Prefix of every generated participant identifier.
pub const PARTICIPANT_PREFIX: &str = "DG";

/// Maximum stored length of a participant identifier.
pub const MAX_PARTICIPANT_ID_LEN: usize = 100;

/// Format a generated identifier, e.g. `DG-3-0042`.
#[must_use]
pub fn format_participant_id(study_id: i64, seq: u32) -> String {
    format!("{PARTICIPANT_PREFIX}-{study_id}-{seq:04}")
}

/// Parse the trailing numeric suffix of an identifier.
///
/// Returns 0 when the last `-`-separated segment is missing or not a number.
/// A zero result means "no usable sequence", not "sequence zero was used".
#[must_use]
pub fn parse_sequence_suffix(participant_id: &str) -> u32 {
    participant_id
        .rsplit('-')
        .next()
        .and_then(|tail| tail.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Normalize an explicitly supplied identifier.
///
/// # Errors
///
/// Returns `CoreError::InvalidIdentifier` if the trimmed value is empty or
/// longer than [`MAX_PARTICIPANT_ID_LEN`].
pub fn normalize_explicit_id(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidIdentifier(
            "participant_id must not be blank".into(),
        ));
    }
    if trimmed.chars().count() > MAX_PARTICIPANT_ID_LEN {
        return Err(CoreError::InvalidIdentifier(format!(
            "participant_id must be at most {MAX_PARTICIPANT_ID_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

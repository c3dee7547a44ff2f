//! Filename sanitization for downloaded songs.
//!
//! Song titles come straight from the album page and routinely contain
//! characters that are invalid on common filesystems (`Ending Theme: Part 2`).

/// Characters removed from every file name.
const DISALLOWED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maps a proposed file name to a filesystem-safe name.
///
/// Rules, applied in order:
/// 1. every `:` becomes `-`
/// 2. every character in `< > : " / \ | ? *` is deleted
/// 3. leading/trailing whitespace is trimmed
/// 4. every remaining space becomes `_`
///
/// No length limit is enforced and reserved device names are not handled.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let replaced = name.replace(':', "-");
    let kept: String = replaced
        .chars()
        .filter(|c| !DISALLOWED_CHARS.contains(c))
        .collect();
    kept.trim().replace(' ', "_")
}

/// Builds the on-disk file name for a song: `sanitize(name + extension)`.
#[must_use]
pub fn target_filename(song_name: &str, extension: &str) -> String {
    sanitize_filename(&format!("{song_name}{extension}"))
}

/// Build the list line for a track from its artist and title.
///
/// Parts that are empty after trimming are skipped; a track with no
/// usable metadata at all falls back to its key-like placeholder.
pub fn compose_display(artist: &str, title: &str, sep: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let artist = artist.trim();
    if !artist.is_empty() {
        parts.push(artist);
    }

    let title = title.trim();
    if !title.is_empty() {
        parts.push(title);
    }

    if parts.is_empty() {
        "<untitled>".to_string()
    } else {
        parts.join(sep)
    }
}

// ABOUTME: Shared utility functions for Planline
// ABOUTME: ID generation and project code helpers

/// Generate a unique project ID (8-character alphanumeric format)
pub fn generate_project_id() -> String {
    // Generate 8-character ID like nanoid
    use rand::Rng;
    const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Derive a short uppercase project code from a project name.
///
/// Multi-word names use word initials ("Atlas Migration Program" -> "AMP"),
/// single-word names use the leading characters ("Orion" -> "ORION").
/// Names without any alphanumeric characters fall back to "PRJ".
pub fn suggest_project_code(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let code: String = if words.len() >= 2 {
        words
            .iter()
            .take(6)
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_ascii_uppercase()
    } else if let Some(word) = words.first() {
        word.chars().take(5).collect::<String>().to_ascii_uppercase()
    } else {
        String::new()
    };

    // Codes must start with a letter and be at least two characters
    if code.len() < 2 || !code.starts_with(|c: char| c.is_ascii_alphabetic()) {
        "PRJ".to_string()
    } else {
        code
    }
}

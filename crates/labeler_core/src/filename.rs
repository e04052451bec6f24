/// Extension carried by every staging artifact.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Derives the staging artifact name for a record:
/// `{time_created}_{title}.txt`, with `:` mapped to `-` and every other
/// path-unsafe character mapped to `_`.
///
/// The derivation is deterministic and performs no collision check; a
/// second record mapping to the same name overwrites the first. That is
/// accepted behavior, not a defect.
pub fn artifact_filename(time_created: &str, title: &str) -> String {
    let joined = format!("{time_created}_{title}");
    let mut name: String = joined
        .chars()
        .map(|c| {
            if c == ':' {
                '-'
            } else if is_forbidden(c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    name.push('.');
    name.push_str(ARTIFACT_EXTENSION);
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | '"' | '/' | '\\' | '|' | '?' | '*')
}

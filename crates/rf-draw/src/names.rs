//! Name list text conversion
//!
//! Settings panels edit a pool as one name per line. These helpers turn that
//! text into the sanitized list the engine expects and back again.

/// Parse newline-separated text into a name list.
///
/// Each line is trimmed (including a trailing `\r`) and blank lines are
/// dropped. Order and duplicates are kept: every occurrence is its own ticket.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Render a name list as newline-separated text
pub fn format_name_list(names: &[String]) -> String {
    names.join("\n")
}

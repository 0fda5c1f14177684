//! String utilities for the domain layer.

/// Single-line preview of a payload, truncated with ellipsis (UTF-8 safe)
///
/// Line breaks and runs of whitespace collapse to one space. `max_chars`
/// counts characters, not bytes, and includes the ellipsis.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}

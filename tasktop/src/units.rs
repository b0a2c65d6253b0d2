//! Size-string handling for chart data.

/// Reads a human size string ("500GB", "512M", "16Gi", "2T") as gigabytes.
/// The suffix is case-insensitive and an optional "i" tags binary units; the
/// math is base-1024 throughout, whichever spelling the source used. A bare
/// number counts as gigabytes, and anything unreadable counts as zero so the
/// charts always have a value to plot.
pub fn normalize_to_gb(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let Some(digit_at) = bytes.iter().position(|b| b.is_ascii_digit()) else {
        return 0.0;
    };
    let mut start = digit_at;
    let mut seen_dot = false;
    if digit_at > 0 && bytes[digit_at - 1] == b'.' {
        start = digit_at - 1;
        seen_dot = true;
    }
    let mut end = digit_at;
    while end < bytes.len() {
        match bytes[end] {
            b if b.is_ascii_digit() => end += 1,
            b'.' if !seen_dot && end + 1 < bytes.len() && bytes[end + 1].is_ascii_digit() => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    let Ok(value) = text[start..end].parse::<f64>() else {
        return 0.0;
    };
    match unit_after(&text[end..]) {
        Some('T') => value * 1024.0,
        Some('M') => value / 1024.0,
        Some('K') => value / (1024.0 * 1024.0),
        Some('B') => value / (1024.0 * 1024.0 * 1024.0),
        // G, Gi, or no suffix at all: already gigabytes.
        _ => value,
    }
}

/// First letter after the number, skipping whitespace. "MB" reads as M.
fn unit_after(rest: &str) -> Option<char> {
    rest.chars()
        .find(|c| !c.is_whitespace())
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
}

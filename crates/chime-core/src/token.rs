//! Shareable-link time tokens.
//!
//! A timer can be configured from a path like `/school/730`: the last
//! segment is a digits-only token that expands to an "HH:MM" time of
//! day. The inverse direction produces the token embedded in share
//! links.

/// Expand a raw URL time token into an "HH:MM" string.
///
/// Non-digit characters are stripped first; interpretation then
/// depends on how many digits remain:
///
/// | digits | meaning                        | example          |
/// |--------|--------------------------------|------------------|
/// | 1      | single hour, minute 0          | "8" -> "08:00"   |
/// | 2      | two-digit hour, minute 0       | "08" -> "08:00"  |
/// | 3      | hour digit + two minute digits | "730" -> "07:30" |
/// | 4      | two hour + two minute digits   | "1430" -> "14:30"|
///
/// Any other digit count yields `None`. No range validation happens
/// here; out-of-range values are rejected downstream when the token
/// is resolved to an instant.
pub fn parse_url_time_token(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        1 => Some(format!("0{digits}:00")),
        2 => Some(format!("{digits}:00")),
        3 => Some(format!("0{}:{}", &digits[..1], &digits[1..])),
        4 => Some(format!("{}:{}", &digits[..2], &digits[2..])),
        _ => None,
    }
}

/// Collapse an "HH:MM" string into its URL token ("07:30" -> "0730").
pub fn time_token_for_url(time: &str) -> String {
    time.replace(':', "")
}

/// Build the shareable path for a purpose and optional end time.
pub fn share_path(purpose: &str, time: Option<&str>) -> String {
    match time {
        Some(t) => format!("/{}/{}", purpose, time_token_for_url(t)),
        None => format!("/{purpose}"),
    }
}

//! Display helpers for counts and durations.

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Thousands-separated rendering of a count, e.g. `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human-readable rendering of a duration given in seconds.
///
/// * under a minute → `"42s"`
/// * under an hour → `"3m 20s"`
/// * otherwise → `"2h 5m 10s"`
pub fn format_seconds(total_seconds: f64) -> String {
    let total = total_seconds.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", group_thousands(hours), minutes, seconds)
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

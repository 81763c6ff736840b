use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*([smhd])?\s*$").expect("static duration pattern compiles")
});

/// Converts a lifetime string such as `"15m"` or `"7d"` into seconds.
///
/// Accepted units are `s`, `m`, `h` and `d` (case-insensitive); a bare number
/// is read as seconds. Anything else, including values that overflow, yields
/// `0` so the resulting cookie expires immediately instead of never.
#[must_use]
pub fn parse_duration(input: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(input) else {
        return 0;
    };

    let Ok(value) = caps[1].parse::<u64>() else {
        return 0;
    };

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "m" => 60,
        Some(unit) if unit == "h" => 60 * 60,
        Some(unit) if unit == "d" => 24 * 60 * 60,
        _ => 1,
    };

    value.checked_mul(multiplier).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("15m"), 900);
        assert_eq!(parse_duration("7d"), 604_800);
        assert_eq!(parse_duration("45s"), 45);
        assert_eq!(parse_duration("1h"), 3600);
    }

    #[test]
    fn test_missing_unit_defaults_to_seconds() {
        assert_eq!(parse_duration("30"), 30);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(parse_duration("  2H "), 7200);
        assert_eq!(parse_duration("10 M"), 600);
    }

    #[test]
    fn test_unparseable_expires_immediately() {
        assert_eq!(parse_duration("bogus"), 0);
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("15w"), 0);
        assert_eq!(parse_duration("-5m"), 0);
        assert_eq!(parse_duration("1.5h"), 0);
    }

    #[test]
    fn test_overflow_expires_immediately() {
        assert_eq!(parse_duration("99999999999999999999"), 0);
        assert_eq!(parse_duration("18446744073709551615d"), 0);
    }
}

//! # Refresh Interval Parsing
//!
//! Parses Kubernetes-style duration strings such as `30s`, `5m`, `1h30m`.

use anyhow::Result;
use regex::Regex;
use std::time::Duration;

/// Parse a Kubernetes duration string into a [`Duration`].
///
/// Accepts one or more `<number><unit>` segments with units `s`, `m`, `h`,
/// `d`, so both `5m` and compound forms like `1h30m` parse. The total must be
/// greater than zero.
pub fn parse_kubernetes_duration(duration_str: &str) -> Result<Duration> {
    let trimmed = duration_str.trim().to_lowercase();

    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("duration string cannot be empty"));
    }

    let shape = Regex::new(r"^(\d+[smhd])+$")
        .map_err(|e| anyhow::anyhow!("failed to compile regex: {e}"))?;
    if !shape.is_match(&trimmed) {
        return Err(anyhow::anyhow!(
            "invalid duration format '{}', expected <number><unit> segments (e.g. '30s', '5m', '1h30m')",
            duration_str.trim()
        ));
    }

    let segments = Regex::new(r"(?P<number>\d+)(?P<unit>[smhd])")
        .map_err(|e| anyhow::anyhow!("failed to compile regex: {e}"))?;

    let mut total_seconds: u64 = 0;
    for captures in segments.captures_iter(&trimmed) {
        let number: u64 = captures["number"]
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid number in duration '{trimmed}': {e}"))?;
        let unit_seconds = match &captures["unit"] {
            "s" => 1,
            "m" => 60,
            "h" => 3600,
            _ => 86400,
        };
        total_seconds = total_seconds
            .checked_add(number.saturating_mul(unit_seconds))
            .ok_or_else(|| anyhow::anyhow!("duration '{trimmed}' overflows"))?;
    }

    if total_seconds == 0 {
        return Err(anyhow::anyhow!(
            "duration must be greater than zero, got '{}'",
            duration_str.trim()
        ));
    }

    Ok(Duration::from_secs(total_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(
            parse_kubernetes_duration("30s").unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_kubernetes_duration("5m").unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            parse_kubernetes_duration("2h").unwrap(),
            Duration::from_secs(7200)
        );
        assert_eq!(
            parse_kubernetes_duration("1d").unwrap(),
            Duration::from_secs(86400)
        );
    }

    #[test]
    fn test_compound_durations() {
        assert_eq!(
            parse_kubernetes_duration("1h30m").unwrap(),
            Duration::from_secs(5400)
        );
        assert_eq!(
            parse_kubernetes_duration("1m30s").unwrap(),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(
            parse_kubernetes_duration(" 10M ").unwrap(),
            Duration::from_secs(600)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_kubernetes_duration("bogus").is_err());
        assert!(parse_kubernetes_duration("").is_err());
        assert!(parse_kubernetes_duration("5").is_err());
        assert!(parse_kubernetes_duration("m5").is_err());
        assert!(parse_kubernetes_duration("5w").is_err());
        assert!(parse_kubernetes_duration("-5m").is_err());
    }

    #[test]
    fn test_rejects_zero() {
        assert!(parse_kubernetes_duration("0s").is_err());
        assert!(parse_kubernetes_duration("0h0m").is_err());
    }
}

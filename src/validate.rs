//! Client-side checks run before anything goes on the wire. Rejections are
//! rendered inline and never reach the backend.

pub const DEFAULT_DURATION_MINUTES: u32 = 20;
pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 240;
pub const MAX_THRESHOLD_KPA: f64 = 300.0;

/// Accepts exactly 16 hex characters in any case, normalized to uppercase.
pub fn normalize_deveui(input: &str) -> Result<String, &'static str> {
    if input.len() != 16 || !input.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("DevEUI must be exactly 16 hexadecimal characters");
    }
    Ok(input.to_ascii_uppercase())
}

/// Names are submitted trimmed; whitespace-only input is rejected.
pub fn trimmed_name(input: &str) -> Result<String, &'static str> {
    let name = input.trim();
    if name.is_empty() {
        return Err("a name is required");
    }
    Ok(name.to_owned())
}

pub fn threshold_kpa(value: f64) -> Result<f64, &'static str> {
    if !value.is_finite() || value <= 0.0 || value > MAX_THRESHOLD_KPA {
        return Err("threshold must be between 1 and 300 kPa");
    }
    Ok(value)
}

/// Rounded and clamped to [1, 240]; empty or unparseable input falls back to
/// the 20 minute default.
pub fn duration_minutes(input: &str) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => {
            v.round()
                .clamp(MIN_DURATION_MINUTES as f64, MAX_DURATION_MINUTES as f64) as u32
        }
        _ => DEFAULT_DURATION_MINUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deveui_accepts_full_hex_and_uppercases() {
        assert_eq!(
            normalize_deveui("0123456789ABCDEF").unwrap(),
            "0123456789ABCDEF"
        );
        assert_eq!(
            normalize_deveui("a84041ffff1f2b3c").unwrap(),
            "A84041FFFF1F2B3C"
        );
    }

    #[test]
    fn deveui_rejects_wrong_length_and_non_hex() {
        assert!(normalize_deveui("0123456789ABCDE").is_err()); // 15 chars
        assert!(normalize_deveui("0123456789ABCDEF0").is_err()); // 17 chars
        assert!(normalize_deveui("0123456789ABCDEG").is_err()); // G is not hex
        assert!(normalize_deveui("").is_err());
        assert!(normalize_deveui(" 123456789ABCDEF").is_err());
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert!(trimmed_name("  ").is_err());
        assert!(trimmed_name("").is_err());
        assert_eq!(trimmed_name("  Garden A  ").unwrap(), "Garden A");
    }

    #[test]
    fn threshold_bounds() {
        assert_eq!(threshold_kpa(30.0).unwrap(), 30.0);
        assert_eq!(threshold_kpa(300.0).unwrap(), 300.0);
        assert!(threshold_kpa(0.0).is_err());
        assert!(threshold_kpa(-1.0).is_err());
        assert!(threshold_kpa(300.1).is_err());
        assert!(threshold_kpa(f64::NAN).is_err());
        assert!(threshold_kpa(f64::INFINITY).is_err());
    }

    #[test]
    fn duration_defaults_rounds_and_clamps() {
        assert_eq!(duration_minutes(""), 20);
        assert_eq!(duration_minutes("garbage"), 20);
        assert_eq!(duration_minutes("500"), 240);
        assert_eq!(duration_minutes("-5"), 1);
        assert_eq!(duration_minutes("0"), 1);
        assert_eq!(duration_minutes("19.6"), 20);
        assert_eq!(duration_minutes("240"), 240);
    }
}

// Utility functions

/// Coerces upstream numeric-like text ("15923000.0") to a whole won
/// amount. Missing or unparseable input counts as zero.
pub fn parse_amount(text: Option<&str>) -> i64 {
    text.and_then(|t| t.trim().parse::<f64>().ok())
        .map(|v| v as i64)
        .unwrap_or(0)
}

/// Formats a won amount with thousands separators: 15923000 -> "15,923,000".
pub fn format_won(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders a raw production stamp ("20260113...") as "2026-01-13".
/// Anything that doesn't start with eight digits comes back unchanged.
pub fn format_production_date(raw: &str) -> String {
    let bytes = raw.as_bytes();
    if bytes.len() >= 8 && bytes[..8].iter().all(u8::is_ascii_digit) {
        format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_handles_float_text() {
        assert_eq!(parse_amount(Some("15923000.0")), 15923000);
        assert_eq!(parse_amount(Some(" 32060670 ")), 32060670);
        assert_eq!(parse_amount(Some("garbage")), 0);
        assert_eq!(parse_amount(None), 0);
    }

    #[test]
    fn format_won_groups_digits() {
        assert_eq!(format_won(0), "0");
        assert_eq!(format_won(999), "999");
        assert_eq!(format_won(1000), "1,000");
        assert_eq!(format_won(15923000), "15,923,000");
        assert_eq!(format_won(-1234567), "-1,234,567");
    }

    #[test]
    fn format_production_date_splits_stamp() {
        assert_eq!(format_production_date("20260113"), "2026-01-13");
        assert_eq!(format_production_date("2026011309"), "2026-01-13");
        assert_eq!(format_production_date("2026"), "2026");
        assert_eq!(format_production_date(""), "");
    }

    #[test]
    fn format_production_date_passes_non_digit_stamps_through() {
        // The upstream occasionally sends free text here; anything that
        // is not a plain digit stamp must come back untouched, never
        // slice mid-character.
        assert_eq!(format_production_date("한국abcd"), "한국abcd");
        assert_eq!(format_production_date("생산일미정"), "생산일미정");
        assert_eq!(format_production_date("2026년 01월"), "2026년 01월");
        assert_eq!(format_production_date("abcd0113"), "abcd0113");
    }
}

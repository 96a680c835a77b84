//! Text-to-scalar coercion for raw cell values.
//!
//! The export is loosely typed: currency cells carry symbols and
//! thousands separators, numeric cells are sometimes blank. Coercion
//! never fails — empty or unparseable text becomes 0.0 and the row keeps
//! flowing. Status/result text is NOT normalized here; case folding
//! happens only at comparison sites so the source label survives.

/// Parse a currency or numeric cell ("$1,234.50", "10", "1.91").
/// Strips everything except digits, '.' and '-'. Defaults to 0.0.
pub fn numeric(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Free-text cell: trimmed, absent key defaulting to empty.
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_plain_and_currency() {
        assert_eq!(numeric("10"), 10.0);
        assert_eq!(numeric("1.91"), 1.91);
        assert_eq!(numeric("$1,234.50"), 1234.5);
        assert_eq!(numeric("-5.25"), -5.25);
    }

    #[test]
    fn numeric_defaults_to_zero() {
        assert_eq!(numeric(""), 0.0);
        assert_eq!(numeric("   "), 0.0);
        assert_eq!(numeric("n/a"), 0.0);
        assert_eq!(numeric("--"), 0.0);
    }

    #[test]
    fn text_defaults() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some("  Won  ")), "Won");
    }
}

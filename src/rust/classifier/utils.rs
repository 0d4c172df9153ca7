/// Lower-cases and trims a reference-table cell or an input description.
pub(crate) fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rounds a model score to two decimal places.
pub(crate) fn round_confidence(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Pothole "), "pothole");
        assert_eq!(normalize_text("BIJLI Nahi"), "bijli nahi");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.8765), 0.88);
        assert_eq!(round_confidence(0.123), 0.12);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
    }
}

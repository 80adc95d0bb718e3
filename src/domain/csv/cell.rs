use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parsed CSV value, either numeric or text.
///
/// Serializes as a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CsvCell {
    Number(f64),
    Text(String),
}

impl CsvCell {
    /// Classify a raw field as numeric or text.
    ///
    /// A field is numeric only when the trimmed text parses as a finite
    /// number whose canonical string form equals the trimmed text exactly.
    /// `"007"` stays text because 7 renders back as "7"; `"42"` becomes
    /// the number 42. Whitespace-only fields become empty text.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CsvCell::Text(String::new());
        }

        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() && value.to_string() == trimmed {
                return CsvCell::Number(value);
            }
        }

        CsvCell::Text(raw.to_string())
    }

    /// Numeric value, if this cell is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CsvCell::Number(value) => Some(*value),
            CsvCell::Text(_) => None,
        }
    }

    /// Whether this cell holds no data at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, CsvCell::Text(text) if text.is_empty())
    }
}

impl fmt::Display for CsvCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvCell::Number(value) => write!(f, "{}", value),
            CsvCell::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer_is_numeric() {
        assert_eq!(CsvCell::classify("42"), CsvCell::Number(42.0));
    }

    #[test]
    fn test_decimal_is_numeric() {
        assert_eq!(CsvCell::classify("-3.5"), CsvCell::Number(-3.5));
    }

    #[test]
    fn test_leading_zeros_stay_text() {
        assert_eq!(CsvCell::classify("007"), CsvCell::Text("007".to_string()));
    }

    #[test]
    fn test_empty_field_stays_empty_text() {
        assert_eq!(CsvCell::classify(""), CsvCell::Text(String::new()));
        assert_eq!(CsvCell::classify("   "), CsvCell::Text(String::new()));
    }

    #[test]
    fn test_scientific_notation_stays_text() {
        // 1e5 renders back as "100000", so the round-trip fails
        assert_eq!(CsvCell::classify("1e5"), CsvCell::Text("1e5".to_string()));
    }

    #[test]
    fn test_trailing_zero_decimal_stays_text() {
        assert_eq!(CsvCell::classify("42.0"), CsvCell::Text("42.0".to_string()));
    }

    #[test]
    fn test_nan_and_infinity_stay_text() {
        assert_eq!(CsvCell::classify("NaN"), CsvCell::Text("NaN".to_string()));
        assert_eq!(CsvCell::classify("inf"), CsvCell::Text("inf".to_string()));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_for_numbers() {
        assert_eq!(CsvCell::classify(" 42 "), CsvCell::Number(42.0));
    }

    #[test]
    fn test_serializes_untagged() {
        let number = serde_json::to_string(&CsvCell::Number(7.0)).unwrap();
        let text = serde_json::to_string(&CsvCell::Text("a".to_string())).unwrap();
        assert_eq!(number, "7.0");
        assert_eq!(text, "\"a\"");
    }
}

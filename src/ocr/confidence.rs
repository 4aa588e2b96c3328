/// Exit code OCR.space reports for a successfully parsed file
pub const PARSE_SUCCESS: i32 = 1;

/// Heuristic 0-100 score derived from how much text came back.
///
/// OCR.space does not report a confidence, so this is a step function of
/// the trimmed text length and not a probability.
pub fn estimate_confidence(exit_code: i32, parsed_text: &str) -> u8 {
    if exit_code != PARSE_SUCCESS {
        return 0;
    }
    match parsed_text.trim().chars().count() {
        n if n > 100 => 95,
        n if n > 50 => 90,
        n if n > 20 => 85,
        n if n > 0 => 80,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_values() {
        assert_eq!(estimate_confidence(1, ""), 0);
        assert_eq!(estimate_confidence(1, &"a".repeat(10)), 80);
        assert_eq!(estimate_confidence(1, &"a".repeat(30)), 85);
        assert_eq!(estimate_confidence(1, &"a".repeat(60)), 90);
        assert_eq!(estimate_confidence(1, &"a".repeat(150)), 95);
    }

    #[test]
    fn breakpoints_are_exclusive() {
        assert_eq!(estimate_confidence(1, &"a".repeat(1)), 80);
        assert_eq!(estimate_confidence(1, &"a".repeat(20)), 80);
        assert_eq!(estimate_confidence(1, &"a".repeat(21)), 85);
        assert_eq!(estimate_confidence(1, &"a".repeat(50)), 85);
        assert_eq!(estimate_confidence(1, &"a".repeat(51)), 90);
        assert_eq!(estimate_confidence(1, &"a".repeat(100)), 90);
        assert_eq!(estimate_confidence(1, &"a".repeat(101)), 95);
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(estimate_confidence(1, "  \n\t  "), 0);
        assert_eq!(estimate_confidence(1, &format!("   {}   \r\n", "a".repeat(21))), 85);
    }

    #[test]
    fn failed_parse_is_zero() {
        for code in [0, -10, 2, 3] {
            assert_eq!(estimate_confidence(code, &"a".repeat(150)), 0);
        }
    }
}

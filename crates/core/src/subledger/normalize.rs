//! Matching keys for free-text auxiliary names.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Canonicalizes a name for comparison.
///
/// Trims, lowercases, collapses whitespace runs to a single space and strips
/// combining marks after NFD decomposition, so `"  Compañía   ÁLVAREZ "` and
/// `"compania alvarez"` produce the same key. Only used as a lookup key,
/// never for display.
#[must_use]
pub fn normalize(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BANCO FORTALEZA", "banco fortaleza")]
    #[case("  banco   fortaleza  ", "banco fortaleza")]
    #[case("Compañía Álvarez", "compania alvarez")]
    #[case("José\tMaría\nPérez", "jose maria perez")]
    #[case("Ü\u{00A0}Ç", "u c")]
    #[case("", "")]
    #[case("   ", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("  Ñandú   SÁNCHEZ ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_precomposed_and_decomposed_match() {
        // "é" as one codepoint vs "e" + combining acute accent
        assert_eq!(normalize("caf\u{00E9}"), normalize("cafe\u{0301}"));
    }
}

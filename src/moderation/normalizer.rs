use unicode_normalization::UnicodeNormalization;

/// Check if character is a combining mark (diacritic)
#[inline]
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

/// Canonicalize text for lexicon matching.
///
/// Decomposes to NFD, drops combining diacritics, turns anything that is not
/// an ASCII letter, digit or space into a space, collapses whitespace and
/// lowercases. The output only contains `[a-z0-9 ]` with single interior
/// spaces and no leading or trailing space.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    // Start true to strip leading whitespace
    let mut last_was_space = true;

    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }

        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            result.push(' ');
            last_was_space = true;
        }
    }

    if result.ends_with(' ') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ')
            && !s.contains("  ")
            && !s.starts_with(' ')
            && !s.ends_with(' ')
    }

    #[test]
    fn test_strips_accents_and_symbols() {
        assert_eq!(normalize_text("Café  Crème!!"), "cafe creme");
        assert_eq!(normalize_text("f*ck-this_thing"), "f ck this thing");
        assert_eq!(normalize_text("  My supervisor was a total fck\u{201d}"), "my supervisor was a total fck");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \t\n "), "");
        assert_eq!(normalize_text("@#$%^&"), "");
    }

    #[test]
    fn test_non_latin_scripts_become_separators() {
        assert_eq!(normalize_text("abc日本語def"), "abc def");
        assert_eq!(normalize_text("ÀÉÎÕÜ"), "aeiou");
    }

    #[test]
    fn test_output_is_canonical_and_idempotent() {
        let samples = [
            "Hello,   WORLD!",
            "\u{00c5}ngstr\u{00f6}m\tunits\n\nand  data",
            "  leading and trailing  ",
            "$h!t 4ss h0le",
            "ＦＵＬＬＷＩＤＴＨ text",
            "zalgo h\u{0338}\u{0321}e\u{0336}llo",
            "",
        ];

        for sample in samples {
            let once = normalize_text(sample);
            assert!(is_canonical(&once), "not canonical: {:?}", once);
            assert_eq!(normalize_text(&once), once);
        }
    }
}

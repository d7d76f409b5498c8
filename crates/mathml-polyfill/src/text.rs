/// The separator used when an `mfenced` has no `separators` attribute.
pub const DEFAULT_SEPARATOR: char = ',';

/// Whitespace as understood by the `open`, `close` and `separators` attributes.
///
/// This is the whitespace class of browser regular expressions: the Unicode `White_Space`
/// property without U+0085 (NEXT LINE), plus U+FEFF.
#[inline]
fn is_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Strip leading and trailing whitespace and replace every inner run of whitespace with a
/// single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for word in text.split(is_whitespace).filter(|word| !word.is_empty()) {
        if !output.is_empty() {
            output.push(' ');
        }
        output.push_str(word);
    }
    output
}

/// Split a `separators` attribute into one token per code point, ignoring whitespace.
///
/// A missing attribute yields the default `[","]`. An attribute that is empty or contains
/// only whitespace yields an empty list, meaning no separators are inserted at all.
pub fn parse_separator_list(value: Option<&str>) -> Vec<char> {
    match value {
        None => vec![DEFAULT_SEPARATOR],
        Some(value) => value.chars().filter(|&c| !is_whitespace(c)).collect(),
    }
}

/// The separator between child `gap` and child `gap + 1` (zero-based). Once the list runs
/// out, its last entry is repeated.
#[inline]
pub fn separator_for_gap(separators: &[char], gap: usize) -> Option<char> {
    separators.get(gap).or(separators.last()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse() {
        assert_eq!(collapse_whitespace("  [ "), "[");
        assert_eq!(collapse_whitespace("\t a \n\r\u{000C} b  c\n"), "a b c");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace(" \n "), "");
        assert_eq!(collapse_whitespace("\u{2016}"), "\u{2016}");
    }

    #[test]
    fn separators_default() {
        assert_eq!(parse_separator_list(None), vec![',']);
    }

    #[test]
    fn separators_empty_is_not_default() {
        assert_eq!(parse_separator_list(Some("")), Vec::<char>::new());
        assert_eq!(parse_separator_list(Some(" \t\n")), Vec::<char>::new());
    }

    #[test]
    fn separators_skip_whitespace() {
        assert_eq!(parse_separator_list(Some(" , ; \u{FEFF}|")), vec![',', ';', '|']);
    }

    #[test]
    fn next_line_is_not_whitespace() {
        assert_eq!(parse_separator_list(Some("\u{85}")), vec!['\u{85}']);
        assert_eq!(collapse_whitespace(" \u{85} "), "\u{85}");
        assert_eq!(collapse_whitespace("a\u{A0}\u{3000}b"), "a b");
    }

    #[test]
    fn separators_astral_code_point() {
        // U+1D7D8 MATHEMATICAL DOUBLE-STRUCK DIGIT ZERO is a surrogate pair in UTF-16.
        assert_eq!(parse_separator_list(Some("\u{1D7D8}")), vec!['\u{1D7D8}']);
        assert_eq!(
            parse_separator_list(Some(",\u{1D7D8};")),
            vec![',', '\u{1D7D8}', ';']
        );
    }

    #[test]
    fn gap_exhaustion() {
        let list = [',', ';'];
        let gaps: Vec<_> = (0..3).map(|gap| separator_for_gap(&list, gap)).collect();
        assert_eq!(gaps, vec![Some(','), Some(';'), Some(';')]);
        assert_eq!(separator_for_gap(&[], 0), None);
    }
}

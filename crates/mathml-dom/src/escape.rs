/// Escapes `&`, `<` and `>` in `input` for inclusion as character data.
///
/// This function uses `memchr` for efficient searching of special characters.
pub fn escape_text(output: &mut String, input: &str) {
    let mut rest = input;
    while let Some(index) = memchr::memchr3(b'&', b'<', b'>', rest.as_bytes()) {
        // The special characters are ASCII, so `index` is a char boundary.
        output.push_str(&rest[..index]);
        match rest.as_bytes()[index] {
            b'&' => output.push_str("&amp;"),
            b'<' => output.push_str("&lt;"),
            _ => output.push_str("&gt;"),
        }
        rest = &rest[index + 1..];
    }
    output.push_str(rest);
}

/// Escapes special characters in `input` for attribute values enclosed in double quotes.
///
/// Specifically, it replaces:
/// - `&` with `&amp;`
/// - `"` with `&quot;`
/// - `<` with `&lt;`
///
/// In contrast to `escape_text`, this function does not use `memchr`, as attributes are
/// typically shorter strings.
pub fn escape_double_quoted_attribute(output: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let mut output = String::new();
        escape_text(&mut output, "");
        assert_eq!(output, "");
    }

    #[test]
    fn test_no_special_characters() {
        let mut output = String::new();
        escape_text(&mut output, "a + b ≤ c");
        assert_eq!(output, "a + b ≤ c");
    }

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text(&mut output, "a<b && c>d");
        assert_eq!(output, "a&lt;b &amp;&amp; c&gt;d");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_double_quoted_attribute(&mut output, r#"say "<hi>" & 'bye'"#);
        assert_eq!(output, "say &quot;&lt;hi>&quot; &amp; 'bye'");
    }
}

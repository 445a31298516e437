//! Line splitting shared by the title extractor and the line parser.
//!
//! Text reaches those stages either from OCR or straight from a caller, so
//! every line boundary a text file may carry is honoured: `\n`, `\r\n`, a
//! lone `\r`, vertical tab, form feed, the ASCII file/group/record
//! separators, NEL and the Unicode line and paragraph separators. A trailing
//! boundary does not produce an empty last line.

/// True for every character that ends a line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{001C}'
            | '\u{001D}'
            | '\u{001E}'
            | '\u{0085}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `text` into lines without their terminators.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(at) = rest.find(is_line_break) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..at];
        let tail = &rest[at..];
        let skip = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[skip..];
        Some(line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        split_lines(text).collect()
    }

    #[test]
    fn newline_variants() {
        assert_eq!(lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(lines("a\r\rb"), vec!["a", "", "b"]);
    }

    #[test]
    fn control_and_unicode_separators() {
        assert_eq!(
            lines("a\u{000B}b\u{000C}c\u{001C}d\u{001D}e\u{001E}f"),
            vec!["a", "b", "c", "d", "e", "f"]
        );
        assert_eq!(
            lines("a\u{0085}b\u{2028}c\u{2029}d"),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn trailing_break_adds_no_empty_line() {
        assert_eq!(lines("a\n"), vec!["a"]);
        assert_eq!(lines("a\n\n"), vec!["a", ""]);
        assert_eq!(lines("\n"), vec![""]);
        assert!(lines("").is_empty());
    }

    #[test]
    fn other_whitespace_is_kept() {
        assert_eq!(lines(" a\tb \n"), vec![" a\tb "]);
    }
}

//! Post-processing: deterministic cleanup of raw OCR page text.
//!
//! Tesseract output carries artefacts that are invisible in a terminal but
//! trip up line-based parsing: a form feed closing every page, stray `\r`
//! from some builds, zero-width characters and soft hyphens copied from the
//! scan's text layer, and trailing blanks. The rules below remove those and
//! nothing else; the line parser still sees every word the OCR produced.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF / CR → LF)
//! 2. Drop form feeds and invisible Unicode
//! 3. Trim trailing whitespace per line
//! 4. Trim trailing blank lines

/// Apply all cleanup rules to one page of OCR output.
pub fn clean_ocr_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    s.trim_end_matches('\n').to_string()
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{000C}' // form feed (tesseract page break)
                    | '\u{200B}' // zero-width space
                    | '\u{200C}' // zero-width non-joiner
                    | '\u{200D}' // zero-width joiner
                    | '\u{2060}' // word joiner
                    | '\u{FEFF}' // BOM
                    | '\u{00AD}' // soft hyphen
            )
        })
        .collect()
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "Home\u{200B}work\u{FEFF} 1\u{00AD} 18/20\u{000C}";
        assert_eq!(remove_invisible_chars(input), "Homework 1 18/20");
    }

    #[test]
    fn test_tesseract_page_output() {
        let raw = "MIS-353-01 Fall  \r\nHomework 1 18/20\t\r\n\r\n\u{000C}";
        assert_eq!(clean_ocr_text(raw), "MIS-353-01 Fall\nHomework 1 18/20");
    }

    #[test]
    fn test_inner_blank_lines_survive() {
        assert_eq!(clean_ocr_text("a\n\n\nb\n"), "a\n\n\nb");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(clean_ocr_text("\u{000C}"), "");
        assert_eq!(clean_ocr_text(""), "");
    }
}

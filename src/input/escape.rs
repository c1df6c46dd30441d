//! String literal escapes for `text:`/`csi:`/`esc:` keybind action params
//! (§4.4): `\\ \n \r \t \0`, `\xNN`, and `\u{...}` (max codepoint
//! `0x10FFFF`). Any other escape, or an unterminated one, is a parse error.

/// Unescape a keybind action parameter string.
///
/// # Errors
///
/// Returns a human-readable reason if an escape sequence is unknown,
/// malformed, or left unterminated at end of input.
pub fn unescape(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hi = chars.next().ok_or("unterminated \\x escape")?;
                let lo = chars.next().ok_or("unterminated \\x escape")?;
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                    .map_err(|_| format!("invalid \\x escape digits {hi}{lo}"))?;
                out.push(byte as char);
            }
            Some('u') => {
                if chars.next() != Some('{') {
                    return Err("\\u escape must be followed by '{'".to_string());
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(h) => hex.push(h),
                        None => return Err("unterminated \\u{...} escape".to_string()),
                    }
                }
                let cp = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid \\u{{...}} escape digits {hex:?}"))?;
                if cp > 0x10_FFFF {
                    return Err(format!("\\u{{...}} codepoint {cp:#x} exceeds 0x10FFFF"));
                }
                let ch = char::from_u32(cp)
                    .ok_or_else(|| format!("\\u{{...}} codepoint {cp:#x} is not a valid scalar value"))?;
                out.push(ch);
            }
            Some(other) => return Err(format!("unknown escape sequence \\{other}")),
            None => return Err("unterminated escape sequence".to_string()),
        }
    }

    Ok(out)
}

/// Escape a string back into keybind action parameter form, the inverse of
/// [`unescape`] for the subset of escapes it actually needs to round-trip:
/// `\\ \n \r \t \0`, plus `\xNN` for other C0 control characters and DEL.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(unescape("hello").unwrap(), "hello");
    }

    #[test]
    fn decodes_simple_escapes() {
        assert_eq!(unescape("\\n\\r\\t\\0\\\\").unwrap(), "\n\r\t\0\\");
    }

    #[test]
    fn decodes_hex_byte_escape() {
        assert_eq!(unescape("\\x1b").unwrap(), "\u{1b}");
    }

    #[test]
    fn decodes_unicode_escape() {
        assert_eq!(unescape("\\u{1F600}").unwrap(), "\u{1F600}");
    }

    #[test]
    fn rejects_codepoint_above_max() {
        assert!(unescape("\\u{110000}").is_err());
    }

    #[test]
    fn rejects_unknown_escape() {
        assert!(unescape("\\q").is_err());
    }

    #[test]
    fn rejects_unterminated_escape() {
        assert!(unescape("\\x1").is_err());
        assert!(unescape("\\u{1234").is_err());
        assert!(unescape("\\").is_err());
    }

    #[test]
    fn escape_round_trips_through_unescape() {
        let text = "line one\nline two\ttabbed\\literal-backslash\r\0";
        assert_eq!(unescape(&escape(text)).unwrap(), text);
    }

    #[test]
    fn escape_uses_hex_for_other_control_chars() {
        assert_eq!(escape("\u{1b}"), "\\x1b");
    }
}

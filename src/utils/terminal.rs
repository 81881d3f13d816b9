//! Terminal output sanitization
//!
//! Contact names and numbers come from the device and are printed verbatim by
//! `list` and `stats`. A name carrying escape sequences could repaint the
//! terminal, so everything user-controlled goes through [`strip_ansi_codes`]
//! before it is printed.

/// Remove ANSI escape sequences and control characters.
///
/// Handles CSI sequences (`ESC [ ... letter`) and OSC sequences
/// (`ESC ] ... BEL` or `ESC ] ... ESC \`). Line breaks and tabs become spaces
/// so each entry stays on one line.
///
/// ```
/// use whatsapper::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[1mAlice\x1b[0m"), "Alice");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next_ch in chars.by_ref() {
                        if next_ch.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next_ch) = chars.next() {
                        if next_ch == '\x07' {
                            break;
                        }
                        if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        match ch {
            '\t' | '\n' | '\r' => result.push(' '),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}

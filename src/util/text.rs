use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Unicode-aware: CJK characters and most emoji occupy two columns,
/// combining marks occupy zero.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// "..." when text was cut off.
///
/// Returns `Cow::Borrowed` when the string already fits. Widths of 3 or
/// fewer columns return as many characters as fit without the ellipsis,
/// since there is no room for both a character and "...".
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut width = 0;
        for (idx, c) in s.char_indices() {
            let cw = UnicodeWidthChar::width(c).unwrap_or(0);
            if width + cw > max_width {
                break;
            }
            width += cw;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut width = 0;
    let mut cut_point = None; // byte index where the ellipsis would start
    let mut exceeded = false;

    for (idx, c) in s.char_indices() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if cut_point.is_none() && width + cw > target_width {
            cut_point = Some(idx);
        }
        if width + cw > max_width {
            exceeded = true;
            break;
        }
        width += cw;
    }

    if exceeded {
        let cut = cut_point.unwrap_or(s.len());
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    } else {
        Cow::Borrowed(s)
    }
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Article titles and category names come from a remote service and are
/// rendered verbatim into the terminal; a title containing an escape
/// sequence must not be able to reposition the cursor or retitle the
/// window. Tab, newline, and carriage return are preserved.
///
/// Returns `Cow::Borrowed` when the input is already clean (common case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    let is_bad =
        |b: u8| b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d);

    if !bytes.iter().copied().any(is_bad) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == 0x1b {
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI: skip parameter bytes until the final byte 0x40-0x7e
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC: skip until BEL or ST
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            } else {
                i += 1;
            }
        } else if is_bad(b) {
            i += 1;
        } else {
            // Batch-copy the run of clean bytes. Control bytes are ASCII and
            // cannot appear mid-codepoint in valid UTF-8, so the slice
            // boundaries are always char boundaries.
            let start = i;
            i += 1;
            while i < len && !is_bad(bytes[i]) {
                i += 1;
            }
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

//! Token boundary detection
//!
//!     A magic link token is `{payload}` on a single line. The payload may not contain any of
//!     `{ } [ ] ( )`, which keeps the token from swallowing nested markdown links, images or
//!     other braces. The character right after the closing brace is inspected but never consumed:
//!     it must not be one of the same six characters, so `{x}(y)` and `{x}[y]` stay plain text.
//!
//!     Offsets are byte offsets into the UTF-8 source, matching markdown-it's `InlineState::pos`.

pub const OPEN: char = '{';
pub const CLOSE: char = '}';

/// A token recognized at a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    /// Text between the braces, untouched.
    pub payload: &'a str,
    /// Bytes covered by the braces and the payload.
    pub consumed: usize,
    /// Character after the closing brace, if any. Left in the stream.
    pub tail: Option<char>,
}

/// Try to recognize a token starting exactly at `pos`.
///
/// Returns `None` when `pos` is not a char boundary, the character there is not `{`, the payload
/// runs into a forbidden character or a newline, or the tail character is forbidden.
pub fn match_token(src: &str, pos: usize) -> Option<TokenMatch<'_>> {
    let body = src.get(pos..)?.strip_prefix(OPEN)?;

    for (offset, ch) in body.char_indices() {
        match ch {
            CLOSE => {
                let tail = body[offset + CLOSE.len_utf8()..].chars().next();
                if tail.is_some_and(is_forbidden) {
                    return None;
                }
                return Some(TokenMatch {
                    payload: &body[..offset],
                    consumed: OPEN.len_utf8() + offset + CLOSE.len_utf8(),
                    tail,
                });
            }
            '\n' => return None,
            ch if is_forbidden(ch) => return None,
            _ => {}
        }
    }

    None
}

fn is_forbidden(ch: char) -> bool {
    matches!(ch, '{' | '}' | '[' | ']' | '(' | ')')
}

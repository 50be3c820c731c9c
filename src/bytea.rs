//! bytea text-format decoding.
//!
//! PostgreSQL emits bytea in one of two forms depending on `bytea_output`:
//!
//! - `hex`: `\x` followed by two hex digits per byte
//! - `escape`: raw bytes, `\\` for a backslash, `\ooo` (three octal digits) for anything else

use crate::error::{ArrayError, ArrayResult};

const HEX_PREFIX: &[u8] = b"\\x";

/// Escape-form scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Raw,
    Escape,
}

/// Decode a bytea text value.
///
/// # Example
///
/// ```
/// use qail_array::bytea::decode_bytea;
///
/// assert_eq!(decode_bytea(br"\x48656c6c6f").unwrap(), b"Hello".to_vec());
/// assert_eq!(decode_bytea(br"a\141\\").unwrap(), b"aa\\".to_vec());
/// ```
pub fn decode_bytea(s: &[u8]) -> ArrayResult<Vec<u8>> {
    match s.strip_prefix(HEX_PREFIX) {
        Some(hex_digits) => Ok(hex::decode(hex_digits)?),
        None => decode_escape(s),
    }
}

fn decode_escape(mut s: &[u8]) -> ArrayResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut state = State::Raw;

    while !s.is_empty() {
        match state {
            State::Raw => match s.iter().position(|&b| b == b'\\') {
                Some(i) => {
                    out.extend_from_slice(&s[..i]);
                    s = &s[i..];
                    state = State::Escape;
                }
                None => {
                    out.extend_from_slice(s);
                    break;
                }
            },
            State::Escape => {
                if s.get(1) == Some(&b'\\') {
                    out.push(b'\\');
                    s = &s[2..];
                } else if s.len() < 4 {
                    return Err(ArrayError::InvalidByteaSequence(format!(
                        "{:?}",
                        String::from_utf8_lossy(s)
                    )));
                } else {
                    out.push(parse_octal(&s[1..4])?);
                    s = &s[4..];
                }
                state = State::Raw;
            }
        }
    }

    Ok(out)
}

/// Parse three octal digits. Values above `\377` wrap to their low 8 bits.
fn parse_octal(digits: &[u8]) -> ArrayResult<u8> {
    let mut value: u16 = 0;
    for &d in digits {
        if !(b'0'..=b'7').contains(&d) {
            return Err(ArrayError::InvalidByteaValue(format!(
                "invalid octal escape {:?}",
                String::from_utf8_lossy(digits)
            )));
        }
        value = value * 8 + u16::from(d - b'0');
    }
    Ok(value as u8)
}

/// Encode bytes as a hex-form bytea value (`\x...`).
///
/// ```
/// use qail_array::bytea::encode_bytea_hex;
///
/// assert_eq!(encode_bytea_hex(&[0xde, 0xad]), r"\xdead");
/// ```
pub fn encode_bytea_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    out.push_str(&hex::encode(bytes));
    out
}

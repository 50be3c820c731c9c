//! Array element quoting.
//!
//! Only `"` and `\` are escaped; every other byte passes through, including
//! the delimiter, braces and control characters, since a quoted element is
//! only terminated by an unescaped `"`.

/// Append `v` to `buf` as a double-quoted array element.
pub fn append_quoted(buf: &mut Vec<u8>, mut v: &[u8]) {
    buf.push(b'"');
    while let Some(i) = v.iter().position(|&b| b == b'"' || b == b'\\') {
        buf.extend_from_slice(&v[..i]);
        buf.push(b'\\');
        buf.push(v[i]);
        v = &v[i + 1..];
    }
    buf.extend_from_slice(v);
    buf.push(b'"');
}

/// Quote a single array element.
///
/// # Example
///
/// ```
/// use qail_array::quote::quote;
///
/// assert_eq!(quote(br#"say "hi""#), br#""say \"hi\"""#.to_vec());
/// ```
pub fn quote(v: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(v.len() + 2);
    append_quoted(&mut buf, v);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote(b"abc"), b"\"abc\"".to_vec());
        assert_eq!(quote(b""), b"\"\"".to_vec());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(br#"a"b"#), br#""a\"b""#.to_vec());
        assert_eq!(quote(br"c\d"), br#""c\\d""#.to_vec());
        assert_eq!(quote(br#"\""#), br#""\\\"""#.to_vec());
    }

    #[test]
    fn test_quote_leaves_other_bytes() {
        assert_eq!(quote(b"a,{b}\n\xff"), b"\"a,{b}\n\xff\"".to_vec());
    }

    #[test]
    fn test_append_quoted_extends() {
        let mut buf = b"{".to_vec();
        append_quoted(&mut buf, b"x");
        buf.push(b'}');
        assert_eq!(buf, b"{\"x\"}".to_vec());
    }
}

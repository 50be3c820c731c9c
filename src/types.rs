//! Typed scan/value conversions for PostgreSQL array and bytea columns.
//!
//! A driver hands each column value to a [`Scan`] implementation as a
//! [`PgValue`], and asks [`ToPg`] implementations for the text it should
//! send back.

use crate::array::{Element, scan_linear_array};
use crate::bytea::{decode_bytea, encode_bytea_hex};
use crate::error::{ArrayError, ArrayResult};
use crate::quote::append_quoted;

/// PostgreSQL Type OIDs
pub mod oid {
    pub const BYTEA: u32 = 17;
    pub const INT8: u32 = 20; // bigint
    pub const TEXT: u32 = 25;

    pub const BYTEA_ARRAY: u32 = 1001;
    pub const TEXT_ARRAY: u32 = 1009;
    pub const INT8_ARRAY: u32 = 1016;
}

/// Text format code.
pub const FORMAT_TEXT: i16 = 0;

/// A column value as delivered by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PgValue<'a> {
    Null,
    Bytes(&'a [u8]),
    Text(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PgValue<'_> {
    /// Name of the representation, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            PgValue::Null => "NULL",
            PgValue::Bytes(_) => "bytes",
            PgValue::Text(_) => "text",
            PgValue::Int(_) => "int8",
            PgValue::Float(_) => "float8",
            PgValue::Bool(_) => "bool",
        }
    }

    /// The textual bytes of the value, `Ok(None)` for NULL. Any other
    /// representation cannot hold a text literal and is refused for `target`.
    fn text_bytes(&self, target: &'static str) -> ArrayResult<Option<&[u8]>> {
        match self {
            PgValue::Null => Ok(None),
            PgValue::Bytes(b) => Ok(Some(*b)),
            PgValue::Text(s) => Ok(Some(s.as_bytes())),
            other => {
                tracing::debug!(found = other.kind(), target, "unsupported scan source");
                Err(ArrayError::UnsupportedSource {
                    found: other.kind(),
                    target,
                })
            }
        }
    }
}

/// Trait for reading a driver value into an existing container.
pub trait Scan {
    /// Replace the contents of `self` with `src`. On error `self` is left
    /// untouched.
    fn scan(&mut self, src: PgValue<'_>) -> ArrayResult<()>;

    /// Build a fresh container from `src`.
    fn from_value(src: PgValue<'_>) -> ArrayResult<Self>
    where
        Self: Default,
    {
        let mut out = Self::default();
        out.scan(src)?;
        Ok(out)
    }
}

/// Trait for converting Rust types to PostgreSQL wire format.
pub trait ToPg {
    /// Convert to PostgreSQL wire format.
    /// Returns (bytes, oid, format_code)
    fn to_pg(&self) -> (Vec<u8>, u32, i16);
}

/// Parse a one-dimensional literal and convert every non-NULL element.
fn scan_elements<T>(
    src: &[u8],
    target: &'static str,
    scalar: &'static str,
    mut convert: impl FnMut(usize, &[u8]) -> ArrayResult<T>,
) -> ArrayResult<Vec<T>> {
    let elems = scan_linear_array(src, b",", target)?;
    elems
        .iter()
        .enumerate()
        .map(|(index, elem)| match elem {
            Element::Null => Err(ArrayError::NullElement { index, scalar }),
            Element::Value(v) => convert(index, &**v),
        })
        .collect()
}

/// Reuse the existing allocation for an empty literal, otherwise replace.
fn replace_contents<T>(dst: &mut Vec<T>, values: Vec<T>) {
    if values.is_empty() {
        dst.clear();
    } else {
        *dst = values;
    }
}

// ==================== text[] ====================

/// One-dimensional `text[]` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringArray(pub Vec<String>);

impl StringArray {
    /// Encode as an array literal with every element quoted.
    ///
    /// ```
    /// use qail_array::StringArray;
    ///
    /// let arr = StringArray(vec!["a\"b".into(), "c\\d".into()]);
    /// assert_eq!(arr.to_literal(), r#"{"a\"b","c\\d"}"#);
    /// ```
    pub fn to_literal(&self) -> String {
        // Only ASCII is inserted between the UTF-8 inputs.
        String::from_utf8_lossy(&self.encode()).into_owned()
    }

    fn encode(&self) -> Vec<u8> {
        let Some((first, rest)) = self.0.split_first() else {
            return b"{}".to_vec();
        };
        // Two quotes per element and one delimiter between each pair.
        let mut buf = Vec::with_capacity(1 + 3 * self.0.len());
        buf.push(b'{');
        append_quoted(&mut buf, first.as_bytes());
        for s in rest {
            buf.push(b',');
            append_quoted(&mut buf, s.as_bytes());
        }
        buf.push(b'}');
        buf
    }
}

impl Scan for StringArray {
    fn scan(&mut self, src: PgValue<'_>) -> ArrayResult<()> {
        let Some(bytes) = src.text_bytes("StringArray")? else {
            self.0 = Vec::new();
            return Ok(());
        };
        let strings = scan_elements(bytes, "StringArray", "string", |index, v| {
            String::from_utf8(v.to_vec())
                .map_err(|e| ArrayError::invalid_element(index, format!("invalid UTF-8: {}", e)))
        })?;
        replace_contents(&mut self.0, strings);
        Ok(())
    }
}

impl ToPg for StringArray {
    fn to_pg(&self) -> (Vec<u8>, u32, i16) {
        (self.encode(), oid::TEXT_ARRAY, FORMAT_TEXT)
    }
}

impl From<Vec<String>> for StringArray {
    fn from(v: Vec<String>) -> Self {
        StringArray(v)
    }
}

// ==================== bytea[] ====================

/// One-dimensional `bytea[]` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteaArray(pub Vec<Vec<u8>>);

impl ByteaArray {
    /// Encode as an array literal of quoted hex-form elements.
    pub fn to_literal(&self) -> String {
        if self.0.is_empty() {
            return "{}".to_string();
        }
        let elems: Vec<String> = self
            .0
            .iter()
            // The element's backslash is itself escaped inside the quotes.
            .map(|b| format!("\"\\{}\"", encode_bytea_hex(b)))
            .collect();
        format!("{{{}}}", elems.join(","))
    }
}

impl Scan for ByteaArray {
    fn scan(&mut self, src: PgValue<'_>) -> ArrayResult<()> {
        let Some(bytes) = src.text_bytes("ByteaArray")? else {
            self.0 = Vec::new();
            return Ok(());
        };
        let blobs = scan_elements(bytes, "ByteaArray", "bytea", |index, v| {
            decode_bytea(v).map_err(|e| ArrayError::invalid_element(index, e.to_string()))
        })?;
        replace_contents(&mut self.0, blobs);
        Ok(())
    }
}

impl ToPg for ByteaArray {
    fn to_pg(&self) -> (Vec<u8>, u32, i16) {
        (self.to_literal().into_bytes(), oid::BYTEA_ARRAY, FORMAT_TEXT)
    }
}

// ==================== int8[] ====================

/// One-dimensional `int8[]` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Int64Array(pub Vec<i64>);

impl Int64Array {
    /// Encode as an array literal. Integers never need quoting.
    pub fn to_literal(&self) -> String {
        let elems: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        format!("{{{}}}", elems.join(","))
    }
}

impl Scan for Int64Array {
    fn scan(&mut self, src: PgValue<'_>) -> ArrayResult<()> {
        let Some(bytes) = src.text_bytes("Int64Array")? else {
            self.0 = Vec::new();
            return Ok(());
        };
        let ints = scan_elements(bytes, "Int64Array", "int64", |index, v| {
            std::str::from_utf8(v)
                .map_err(|e| e.to_string())
                .and_then(|s| s.parse::<i64>().map_err(|e| format!("invalid int64: {}", e)))
                .map_err(|msg| ArrayError::invalid_element(index, msg))
        })?;
        replace_contents(&mut self.0, ints);
        Ok(())
    }
}

impl ToPg for Int64Array {
    fn to_pg(&self) -> (Vec<u8>, u32, i16) {
        (self.to_literal().into_bytes(), oid::INT8_ARRAY, FORMAT_TEXT)
    }
}

// ==================== bytea ====================

/// Scalar `bytea` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytea(pub Vec<u8>);

impl Scan for Bytea {
    fn scan(&mut self, src: PgValue<'_>) -> ArrayResult<()> {
        self.0 = match src.text_bytes("Bytea")? {
            Some(bytes) => decode_bytea(bytes)?,
            None => Vec::new(),
        };
        Ok(())
    }
}

impl ToPg for Bytea {
    fn to_pg(&self) -> (Vec<u8>, u32, i16) {
        (encode_bytea_hex(&self.0).into_bytes(), oid::BYTEA, FORMAT_TEXT)
    }
}

//! PostgreSQL array literal parser.
//!
//! Parses the text form of an array value into a flat element list plus
//! one length per nesting level.
//!
//! # Syntax Overview
//!
//! ```text
//! {{a,"b c"},{NULL,"d\"e"}}
//! ┬┬ ─┬─ ──┬──  ──┬─ ───┬──
//! ││  │    │      │     └── Quoted element (backslash escapes resolved)
//! ││  │    │      └── Unquoted NULL sentinel
//! ││  │    └── Quoted element
//! ││  └── Unquoted element (passed through raw)
//! │└── Dimension 2
//! └── Dimension 1
//! ```
//!
//! Only the shape is validated; nested values are never materialized.

use std::borrow::Cow;

use crate::error::{ArrayError, ArrayResult};

/// The unquoted token that marks a NULL element.
const NULL_TOKEN: &[u8] = b"NULL";

/// One array entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    /// The unquoted `NULL` sentinel.
    Null,
    /// Element bytes. Borrowed from the literal unless escapes had to be resolved.
    Value(Cow<'a, [u8]>),
}

impl Element<'_> {
    /// Returns the element bytes, or `None` for NULL.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Element::Null => None,
            Element::Value(v) => Some(v),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Element::Null)
    }

    /// Detach the element from the literal it was parsed from.
    pub fn into_owned(self) -> Element<'static> {
        match self {
            Element::Null => Element::Null,
            Element::Value(v) => Element::Value(Cow::Owned(v.into_owned())),
        }
    }
}

/// Result of parsing an array literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArray<'a> {
    /// Length of each nesting level, outermost first. Empty for `{}`.
    pub dims: Vec<usize>,
    /// All elements in literal order, flattened across sub-arrays.
    pub elements: Vec<Element<'a>>,
}

/// Scanner phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Leading run of `{`.
    OpenBraces,
    /// Descend into sub-arrays, then read one element.
    Element,
    /// Delimiter or closing braces after an element.
    Delimit,
    /// Remaining `}` after the empty-array shortcut, or end of input.
    TrailingClose,
}

struct Parser<'a, 'd> {
    src: &'a [u8],
    del: &'d [u8],
    pos: usize,
    depth: usize,
    dims: Vec<usize>,
    elements: Vec<Element<'a>>,
}

impl<'a, 'd> Parser<'a, 'd> {
    fn at_delimiter(&self) -> bool {
        self.src[self.pos..].starts_with(self.del)
    }

    fn open_braces(&mut self) -> Phase {
        while let Some(&b) = self.src.get(self.pos) {
            match b {
                b'{' => {
                    self.depth += 1;
                    self.pos += 1;
                }
                b'}' => return Phase::TrailingClose,
                _ => break,
            }
        }
        self.dims = vec![0; self.pos];
        Phase::Element
    }

    fn element(&mut self) -> ArrayResult<Phase> {
        while let Some(&b) = self.src.get(self.pos) {
            match b {
                b'{' => {
                    if self.depth == self.dims.len() {
                        break;
                    }
                    self.depth += 1;
                    self.dims[self.depth - 1] = 0;
                    self.pos += 1;
                }
                b'"' => {
                    self.quoted();
                    break;
                }
                _ => {
                    self.unquoted()?;
                    break;
                }
            }
        }
        Ok(Phase::Delimit)
    }

    /// Read a quoted element. An unterminated quote consumes the rest of the
    /// input and is reported later as a missing `}`.
    fn quoted(&mut self) {
        self.pos += 1;
        let start = self.pos;
        let mut owned: Option<Vec<u8>> = None;
        let mut escape = false;

        while let Some(&b) = self.src.get(self.pos) {
            if escape {
                if let Some(buf) = owned.as_mut() {
                    buf.push(b);
                }
                escape = false;
            } else {
                match b {
                    b'\\' => {
                        if owned.is_none() {
                            owned = Some(self.src[start..self.pos].to_vec());
                        }
                        escape = true;
                    }
                    b'"' => {
                        let value = match owned {
                            Some(buf) => Cow::Owned(buf),
                            None => Cow::Borrowed(&self.src[start..self.pos]),
                        };
                        self.elements.push(Element::Value(value));
                        self.pos += 1;
                        return;
                    }
                    _ => {
                        if let Some(buf) = owned.as_mut() {
                            buf.push(b);
                        }
                    }
                }
            }
            self.pos += 1;
        }
    }

    /// Read an unquoted element up to the delimiter or `}`. Running off the
    /// end of the input drops the partial element; the missing `}` is
    /// reported later.
    fn unquoted(&mut self) -> ArrayResult<()> {
        let start = self.pos;
        while self.pos < self.src.len() {
            if self.at_delimiter() || self.src[self.pos] == b'}' {
                let elem = &self.src[start..self.pos];
                if elem.is_empty() {
                    return Err(ArrayError::unexpected(self.src[self.pos], self.pos));
                }
                self.elements.push(if elem == NULL_TOKEN {
                    Element::Null
                } else {
                    Element::Value(Cow::Borrowed(elem))
                });
                return Ok(());
            }
            self.pos += 1;
        }
        Ok(())
    }

    fn delimit(&mut self) -> ArrayResult<Phase> {
        while let Some(&b) = self.src.get(self.pos) {
            if self.depth > 0 && self.at_delimiter() {
                self.dims[self.depth - 1] += 1;
                self.pos += self.del.len();
                return Ok(Phase::Element);
            } else if self.depth > 0 && b == b'}' {
                self.dims[self.depth - 1] += 1;
                self.depth -= 1;
                self.pos += 1;
            } else {
                return Err(ArrayError::unexpected(b, self.pos));
            }
        }
        Ok(Phase::TrailingClose)
    }

    fn trailing_close(&mut self) -> ArrayResult<()> {
        while let Some(&b) = self.src.get(self.pos) {
            if b == b'}' && self.depth > 0 {
                self.depth -= 1;
                self.pos += 1;
            } else {
                return Err(ArrayError::unexpected(b, self.pos));
            }
        }
        Ok(())
    }

    fn finish(self) -> ArrayResult<ParsedArray<'a>> {
        if self.depth > 0 {
            return Err(ArrayError::expected(b'}', self.pos));
        }
        let total = self.elements.len();
        if self.dims.iter().any(|&d| d == 0 || total % d != 0) {
            return Err(ArrayError::MismatchedDimensions);
        }
        Ok(ParsedArray {
            dims: self.dims,
            elements: self.elements,
        })
    }
}

/// Parse an array literal using `del` as the element delimiter.
///
/// # Example
///
/// ```
/// use qail_array::array::{parse_array, Element};
///
/// let parsed = parse_array(b"{{1,2},{3,4}}", b",").unwrap();
/// assert_eq!(parsed.dims, vec![2, 2]);
/// assert_eq!(parsed.elements.len(), 4);
/// assert_eq!(parsed.elements[0].as_bytes(), Some(&b"1"[..]));
/// ```
pub fn parse_array<'a>(src: &'a [u8], del: &[u8]) -> ArrayResult<ParsedArray<'a>> {
    if del.is_empty() {
        return Err(ArrayError::EmptyDelimiter);
    }
    if src.first() != Some(&b'{') {
        return Err(ArrayError::expected(b'{', 0));
    }

    let mut parser = Parser {
        src,
        del,
        pos: 0,
        depth: 0,
        dims: Vec::new(),
        elements: Vec::new(),
    };

    let mut phase = Phase::OpenBraces;
    loop {
        phase = match phase {
            Phase::OpenBraces => parser.open_braces(),
            Phase::Element => parser.element()?,
            Phase::Delimit => parser.delimit()?,
            Phase::TrailingClose => {
                parser.trailing_close()?;
                break;
            }
        };
    }

    let parsed = parser.finish()?;
    tracing::trace!(
        dims = ?parsed.dims,
        elements = parsed.elements.len(),
        "parsed array literal"
    );
    Ok(parsed)
}

/// Parse a literal that must be one-dimensional and return its elements.
///
/// `target` names the type being scanned into and appears in the error
/// when the literal has more than one dimension.
pub fn scan_linear_array<'a>(
    src: &'a [u8],
    del: &[u8],
    target: &'static str,
) -> ArrayResult<Vec<Element<'a>>> {
    let parsed = parse_array(src, del)?;
    if parsed.dims.len() > 1 {
        tracing::debug!(dims = ?parsed.dims, target, "rejecting multidimensional array");
        return Err(ArrayError::Dimensions {
            dims: parsed.dims,
            target,
        });
    }
    Ok(parsed.elements)
}

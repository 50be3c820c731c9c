//! # qail-array — PostgreSQL array and bytea text codec
//!
//! Converts between Rust values and the text forms PostgreSQL uses for
//! array and `bytea` columns.
//!
//! ## Quick Example
//!
//! ```
//! use qail_array::prelude::*;
//!
//! // Decode a text[] column
//! let arr = StringArray::from_value(PgValue::Text(r#"{a,"b,c",NULL}"#));
//! assert!(arr.is_err()); // NULL cannot become a String
//!
//! let arr = StringArray::from_value(PgValue::Text(r#"{a,"b,c"}"#)).unwrap();
//! assert_eq!(arr.0, vec!["a", "b,c"]);
//!
//! // Encode it back
//! assert_eq!(arr.to_literal(), r#"{"a","b,c"}"#);
//!
//! // Decode a bytea column
//! assert_eq!(decode_bytea(br"\x4869").unwrap(), b"Hi");
//! ```
//!
//! ## Modules
//!
//! | Module     | Function                                         |
//! |------------|--------------------------------------------------|
//! | [`array`]  | Array literal grammar, dimension checks          |
//! | [`quote`]  | Element quoting for the encoder                  |
//! | [`bytea`]  | `\x` hex and backslash-escape bytea decoding     |
//! | [`types`]  | `Scan` / `ToPg` for `text[]`, `bytea[]`, `int8[]` |
//! | [`config`] | TOML settings for the `qail-array` CLI           |

pub mod array;
pub mod bytea;
pub mod config;
pub mod error;
pub mod quote;
pub mod types;

pub use array::{Element, ParsedArray, parse_array, scan_linear_array};
pub use bytea::{decode_bytea, encode_bytea_hex};
pub use error::{ArrayError, ArrayResult};
pub use types::{Bytea, ByteaArray, Int64Array, PgValue, Scan, StringArray, ToPg};

pub mod prelude {
    pub use crate::array::{Element, ParsedArray, parse_array, scan_linear_array};
    pub use crate::bytea::{decode_bytea, encode_bytea_hex};
    pub use crate::error::*;
    pub use crate::quote::quote;
    pub use crate::types::*;
}

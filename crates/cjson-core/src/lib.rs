//! # cjson-core
//!
//! A small, self-contained JSON codec: text in, generic [`Value`] tree out, and
//! back again. It exists to be embedded in a host runtime (see the
//! `cjson-python` crate) that wants JSON support without pulling in a full
//! JSON library.
//!
//! The codec is intentionally lenient. Escape sequences are kept verbatim
//! rather than decoded, integral numerals such as `3.0` decode as integers,
//! and strings are written back unescaped. See [`decoder`] and [`encoder`] for
//! the exact rules.
//!
//! ## Quick start
//!
//! ```rust
//! use cjson_core::{decode_str, encode, Value};
//!
//! let value = decode_str(r#"{"name":"Alice","scores":[95,87.5]}"#).unwrap();
//! assert_eq!(value["name"], Value::String("Alice".into()));
//! assert_eq!(value["scores"][1], Value::Float(87.5));
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(text, r#"{"name": "Alice", "scores": [95, 87.5]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: JSON bytes → [`Value`]
//! - [`encoder`]: [`Value`] (or any `serde::Serialize` host value) → JSON text
//! - [`value`]: the value tree
//! - [`error`]: error kinds shared by both directions

pub mod decoder;
pub mod encoder;
pub mod error;
mod scanner;
pub mod value;

pub use decoder::{decode, decode_str};
pub use encoder::{encode, to_string, RawInteger};
pub use error::{Error, ErrorKind, Result};
pub use value::{Map, Value};

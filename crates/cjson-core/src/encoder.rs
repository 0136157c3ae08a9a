//! Tree-walking encoder: renders a [`Value`], or any [`Serialize`] host value,
//! as JSON text.
//!
//! The encoder is a serde [`Serializer`], so the runtime type dispatch happens
//! through the serde data model rather than through type checks:
//!
//! - unit / `None` → `null`, booleans → `true` / `false`
//! - integers → decimal text; floats → shortest round-trip text (`3.0`, `0.1`,
//!   `1e+16`, `1e-05`), with NaN and the infinities spelled `nan`, `inf`, `-inf`
//! - strings → wrapped in `"` with the raw characters copied through **unescaped**
//! - sequences and tuples → `[a, b]`; maps and structs → `{"k": v, "l": w}`
//! - enum variants carrying data → a single-entry object keyed by variant name
//!
//! Integers too wide for the serde model travel as [`RawInteger`] text.
//! Byte buffers have no rendering and fail with [`Error::UnsupportedType`];
//! a map key that is not a string fails with [`Error::NonStringKey`].
//!
//! Strings are not escaped. A string holding `"` or `\` therefore produces
//! text that the decoder (or any JSON parser) reads differently; callers that
//! need round-trip fidelity must keep such characters out of their data.
//!
//! All output goes to a single growing `String`.

use serde::ser::{
    Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::value::Value;

/// Encode a value tree as JSON text.
///
/// A well-formed [`Value`] always encodes successfully; the `Result` is shared
/// with [`to_string`], whose host values may not.
pub fn encode(value: &Value) -> Result<String> {
    to_string(value)
}

/// Encode any serializable host value as JSON text.
///
/// Fails without partial output on the first byte buffer or non-string map key.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut enc = Encoder {
        out: String::new(),
        raw: false,
    };
    match value.serialize(&mut enc) {
        Ok(()) => {
            trace!(len = enc.out.len(), "encoded");
            Ok(enc.out)
        }
        Err(e) => {
            debug!(kind = ?e.kind(), "encode failed: {e}");
            Err(e)
        }
    }
}

/// Newtype-struct name that marks a [`RawInteger`] on its way through serde.
const RAW_INTEGER: &str = "$cjson::RawInteger";

/// An integer carried as decimal text, for hosts whose integers outgrow the
/// 128-bit serde model. This encoder writes the digits unquoted; other
/// serializers see a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawInteger<'a>(&'a str);

impl<'a> RawInteger<'a> {
    /// Accepts an optional `-` followed by one or more ASCII digits.
    pub fn new(text: &'a str) -> Result<Self> {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(RawInteger(text))
        } else {
            Err(Error::UnsupportedType(format!("integer text {text:?}")))
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl Serialize for RawInteger<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(RAW_INTEGER, self.0)
    }
}

struct Encoder {
    out: String,
    /// Set while a [`RawInteger`] is being written: strings go out unquoted.
    raw: bool,
}

impl Encoder {
    fn push_quoted(&mut self, s: &str) {
        self.out.reserve(s.len() + 2);
        self.out.push('"');
        self.out.push_str(s);
        self.out.push('"');
    }

    /// Opens a compound value. `close` is written when the compound ends.
    fn open(&mut self, open: &str, close: &'static str) -> Compound<'_> {
        self.out.push_str(open);
        Compound {
            enc: self,
            first: true,
            close,
        }
    }

    /// Opens `{"variant": ` around a data-carrying enum variant.
    fn open_variant(&mut self, variant: &str) {
        self.out.push('{');
        self.push_quoted(variant);
        self.out.push_str(": ");
    }
}

/// Float text in the host's spelling. `Debug` already picks the same digits
/// and switches to exponent form at the same thresholds (`< 1e-4`, `>= 1e16`);
/// the exponent itself is rewritten to carry a sign and at least two digits
/// (`1e+16`, `1e-05`), and NaN is spelled `nan`.
fn format_float<F: std::fmt::Debug>(f: F, is_nan: bool) -> String {
    if is_nan {
        return "nan".to_string();
    }
    let text = format!("{f:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

impl<'a> Serializer for &'a mut Encoder {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.out.push_str(if v { "true" } else { "false" });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.out.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.out.push_str(&format_float(v, v.is_nan()));
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.out.push_str(&format_float(v, v.is_nan()));
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        if self.raw {
            self.out.push_str(v);
        } else {
            self.push_quoted(v);
        }
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::UnsupportedType("bytes".to_string()))
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.out.push_str("null");
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if name == RAW_INTEGER {
            self.raw = true;
            let result = value.serialize(&mut *self);
            self.raw = false;
            return result;
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.open_variant(variant);
        value.serialize(&mut *self)?;
        self.out.push('}');
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'a>> {
        Ok(self.open("[", "]"))
    }

    fn serialize_tuple(self, len: usize) -> Result<Compound<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Compound<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>> {
        self.open_variant(variant);
        Ok(self.open("[", "]}"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'a>> {
        Ok(self.open("{", "}"))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Compound<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>> {
        self.open_variant(variant);
        Ok(self.open("{", "}}"))
    }
}

/// An open array or object: tracks whether a `", "` separator is due.
struct Compound<'a> {
    enc: &'a mut Encoder,
    first: bool,
    close: &'static str,
}

impl Compound<'_> {
    fn separate(&mut self) {
        if self.first {
            self.first = false;
        } else {
            self.enc.out.push_str(", ");
        }
    }

    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        value.serialize(&mut *self.enc)
    }

    fn field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        self.enc.push_quoted(key);
        self.enc.out.push_str(": ");
        value.serialize(&mut *self.enc)
    }

    fn finish(self) -> Result<()> {
        self.enc.out.push_str(self.close);
        Ok(())
    }
}

impl SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.separate();
        // Whatever stops a key from rendering, the key is not a string.
        key.serialize(KeyEncoder { out: &mut self.enc.out })
            .map_err(|_| Error::NonStringKey)?;
        self.enc.out.push_str(": ");
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.enc)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Writes a map key. Only string-like keys are accepted; everything else is
/// [`Error::NonStringKey`].
struct KeyEncoder<'a> {
    out: &'a mut String,
}

impl KeyEncoder<'_> {
    fn reject<T>(self) -> Result<T> {
        Err(Error::NonStringKey)
    }
}

impl Serializer for KeyEncoder<'_> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_str(self, v: &str) -> Result<()> {
        self.out.reserve(v.len() + 2);
        self.out.push('"');
        self.out.push_str(v);
        self.out.push('"');
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if name == RAW_INTEGER {
            return self.reject();
        }
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<()> {
        self.reject()
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        self.reject()
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        self.reject()
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        self.reject()
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        self.reject()
    }

    fn serialize_i128(self, _v: i128) -> Result<()> {
        self.reject()
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        self.reject()
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        self.reject()
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        self.reject()
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        self.reject()
    }

    fn serialize_u128(self, _v: u128) -> Result<()> {
        self.reject()
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        self.reject()
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        self.reject()
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        self.reject()
    }

    fn serialize_none(self) -> Result<()> {
        self.reject()
    }

    fn serialize_some<T>(self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.reject()
    }

    fn serialize_unit(self) -> Result<()> {
        self.reject()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.reject()
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.reject()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.reject()
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.reject()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.reject()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.reject()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.reject()
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.reject()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.reject()
    }
}

//! Binary KeyValues codec for Steam's `shortcuts.vdf`.
//!
//! The format is type-tagged and nested, with NUL-terminated strings and no
//! length prefixes. Each pair is `[1-byte tag][key NUL][value]`:
//!
//! - `0x00` opens a nested object; its value is a pair sequence ending with
//!   an `0x08` end-of-object marker
//! - `0x01` is a string value: NUL-terminated UTF-8
//! - `0x02` is an unsigned 32-bit integer: exactly 4 bytes, little-endian
//!
//! A file is the body of an implicit root object, so the smallest valid
//! shortcuts file is `\x00shortcuts\x00\x08\x08`.
//!
//! Without length prefixes there is no way to resynchronize after a bad
//! byte, so decoding validates tags strictly and fails fast instead of
//! attempting recovery. Encoding is lossless for anything decoding produces
//! and rejects strings that cannot survive NUL termination.

use crate::error::{Result, ShortcutError};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

const TAG_OBJECT: u8 = 0x00;
const TAG_STRING: u8 = 0x01;
const TAG_U32: u8 = 0x02;
const TAG_END: u8 = 0x08;

/// Decoding recurses once per nesting level, and real files nest three
/// deep (shortcuts, entry, tags). Anything past this cap is malformed
/// input, not data.
const MAX_DEPTH: usize = 64;

/// One value in a KeyValues tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Object(Object),
    String(String),
    U32(u32),
}

/// An ordered sequence of key-value pairs.
///
/// Steam's own writers are inconsistent about key casing (`Exe` vs `exe`,
/// `AppName` vs `appname`), so lookups match case-insensitively while
/// serialization preserves the stored order and spelling exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object(Vec<(String, Value)>);

impl Object {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a pair. Keys are not deduplicated; the shortcuts format
    /// itself stores duplicated-case pairs (`Exe` and `exe`).
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    /// First value whose key matches case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        match self.get(key) {
            Some(Value::U32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decode a complete shortcuts file into its implicit root object.
///
/// Fails with [`ShortcutError::Format`] on truncation, an unrecognized type
/// tag, a missing end-of-object marker, objects nested past the fixed depth
/// cap, invalid UTF-8, or trailing bytes after the root object closes.
pub fn from_bytes(bytes: &[u8]) -> Result<Object> {
    let mut decoder = Decoder { buf: bytes, pos: 0 };
    let root = decoder.read_object_body(0)?;
    if decoder.pos != bytes.len() {
        return Err(ShortcutError::format_at(
            decoder.pos,
            format!(
                "{} trailing byte(s) after end of data",
                bytes.len() - decoder.pos
            ),
        ));
    }
    Ok(root)
}

/// Encode an implicit root object into shortcuts-file bytes.
///
/// Fails with [`ShortcutError::Encode`] if any key or string value contains
/// an interior NUL byte, which the format cannot represent.
pub fn to_bytes(root: &Object) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_object_body(&mut buf, root)?;
    Ok(buf)
}

struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| {
            ShortcutError::format_at(self.pos, "unexpected end of input")
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let end = self.pos + 4;
        if end > self.buf.len() {
            return Err(ShortcutError::format_at(
                self.buf.len(),
                "unexpected end of input in integer value",
            ));
        }
        let value = LittleEndian::read_u32(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(value)
    }

    fn read_cstring(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.buf[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ShortcutError::format_at(start, "unterminated string"))?;
        let s = std::str::from_utf8(&self.buf[start..start + len])
            .map_err(|e| {
                ShortcutError::format_at(start, format!("invalid UTF-8 in string: {e}"))
            })?
            .to_string();
        self.pos = start + len + 1;
        Ok(s)
    }

    fn read_object_body(&mut self, depth: usize) -> Result<Object> {
        let mut obj = Object::new();
        loop {
            let tag_pos = self.pos;
            let tag = self.read_u8().map_err(|_| {
                ShortcutError::format_at(
                    tag_pos,
                    "unexpected end of input, missing end-of-object marker",
                )
            })?;
            if tag == TAG_END {
                return Ok(obj);
            }
            let key = self.read_cstring()?;
            let value = match tag {
                TAG_OBJECT if depth >= MAX_DEPTH => {
                    return Err(ShortcutError::format_at(
                        tag_pos,
                        format!("object nesting exceeds {MAX_DEPTH} levels"),
                    ))
                }
                TAG_OBJECT => Value::Object(self.read_object_body(depth + 1)?),
                TAG_STRING => Value::String(self.read_cstring()?),
                TAG_U32 => Value::U32(self.read_u32()?),
                other => {
                    return Err(ShortcutError::format_at(
                        tag_pos,
                        format!("unrecognized type tag 0x{other:02X}"),
                    ))
                }
            };
            obj.push(key, value);
        }
    }
}

fn write_object_body(buf: &mut Vec<u8>, obj: &Object) -> Result<()> {
    for (key, value) in obj.iter() {
        let tag = match value {
            Value::Object(_) => TAG_OBJECT,
            Value::String(_) => TAG_STRING,
            Value::U32(_) => TAG_U32,
        };
        buf.write_u8(tag)?;
        write_cstring(buf, key, "key")?;
        match value {
            Value::Object(inner) => write_object_body(buf, inner)?,
            Value::String(s) => write_cstring(buf, s, "string value")?,
            Value::U32(v) => buf.write_u32::<LittleEndian>(*v)?,
        }
    }
    buf.write_u8(TAG_END)?;
    Ok(())
}

fn write_cstring(buf: &mut Vec<u8>, s: &str, what: &str) -> Result<()> {
    if s.bytes().any(|b| b == 0) {
        return Err(ShortcutError::Encode {
            message: format!("interior NUL byte in {what}: {s:?}"),
        });
    }
    buf.extend_from_slice(s.as_bytes());
    buf.write_u8(0)?;
    Ok(())
}

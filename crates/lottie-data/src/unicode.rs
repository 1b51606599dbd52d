//! UTF-8 text decoded into code points.
//!
//! The decoder accepts the original (pre RFC 3629) UTF-8 forms of up to six
//! bytes, so text produced by older exporters keeps its code points even
//! when they lie outside the Unicode scalar range. Overlong encodings,
//! truncated sequences and misplaced continuation bytes are rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextDecodeError {
    #[error("byte {byte:#04x} at index {index} cannot start a UTF-8 sequence")]
    InvalidLeadByte { byte: u8, index: usize },
    #[error("byte {byte:#04x} at index {index} is not a continuation byte")]
    InvalidContinuation { byte: u8, index: usize },
    #[error("UTF-8 sequence starting at index {index} is truncated")]
    Truncated { index: usize },
    #[error("overlong UTF-8 encoding at index {index}")]
    Overlong { index: usize },
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

/// Decodes `input` into code points.
pub fn decode_utf8(input: &[u8]) -> Result<Vec<u32>, TextDecodeError> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let lead = input[i];
        // (sequence length, payload bits of the lead byte, smallest legal code point)
        let (len, mut code, min) = match lead {
            b if b & 0x80 == 0 => {
                out.push(u32::from(b));
                i += 1;
                continue;
            }
            b if b & 0xe0 == 0xc0 => (2, u32::from(b & 0x1f), 0x80),
            b if b & 0xf0 == 0xe0 => (3, u32::from(b & 0x0f), 0x800),
            b if b & 0xf8 == 0xf0 => (4, u32::from(b & 0x07), 0x1_0000),
            b if b & 0xfc == 0xf8 => (5, u32::from(b & 0x03), 0x20_0000),
            b if b & 0xfe == 0xfc => (6, u32::from(b & 0x01), 0x400_0000),
            byte => return Err(TextDecodeError::InvalidLeadByte { byte, index: i }),
        };

        for k in 1..len {
            let byte = *input
                .get(i + k)
                .ok_or(TextDecodeError::Truncated { index: i })?;
            if !is_continuation(byte) {
                return Err(TextDecodeError::InvalidContinuation { byte, index: i + k });
            }
            code = (code << 6) | u32::from(byte & 0x3f);
        }

        if code < min {
            return Err(TextDecodeError::Overlong { index: i });
        }
        out.push(code);
        i += len;
    }

    Ok(out)
}

/// Text kept both as the raw UTF-8 bytes it was assigned from and as
/// decoded code points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unicode {
    utf8: Vec<u8>,
    code_points: Box<[u32]>,
}

impl Unicode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_utf8(input: &[u8]) -> Result<Self, TextDecodeError> {
        let code_points = decode_utf8(input)?;
        Ok(Self {
            utf8: input.to_vec(),
            code_points: code_points.into_boxed_slice(),
        })
    }

    /// Replaces the text. On a decode failure the previous text is kept and
    /// the failure is logged; the error is returned for callers that care.
    pub fn set_utf8_text(&mut self, input: impl Into<Vec<u8>>) -> Result<(), TextDecodeError> {
        let input = input.into();
        match decode_utf8(&input) {
            Ok(code_points) => {
                self.utf8 = input;
                self.code_points = code_points.into_boxed_slice();
                Ok(())
            }
            Err(err) => {
                warn!(
                    text = %String::from_utf8_lossy(&input),
                    error = %err,
                    "failed to decode UTF-8 text, keeping previous text"
                );
                Err(err)
            }
        }
    }

    pub fn utf8_text(&self) -> &[u8] {
        &self.utf8
    }

    /// The text as a `str`, if the stored bytes are standard UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.utf8).ok()
    }

    pub fn code_points(&self) -> &[u32] {
        &self.code_points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.code_points.iter()
    }

    pub fn len(&self) -> usize {
        self.code_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<u32> {
        self.code_points.get(index).copied()
    }

    /// `true` when both texts carry the same code points.
    pub fn same_text(&self, other: &Unicode) -> bool {
        self.code_points == other.code_points
    }
}

impl<'a> IntoIterator for &'a Unicode {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<String> for Unicode {
    type Error = TextDecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Unicode::from_utf8(value.as_bytes())
    }
}

impl From<Unicode> for String {
    fn from(value: Unicode) -> Self {
        match String::from_utf8(value.utf8) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

//! FITS header parsing: 2880-byte blocks of 80-byte keyword cards.
//!
//! Only the card grammar needed for the survey's data products is handled:
//! logical, integer, real and quoted-string values, with optional trailing
//! comments. Continuation cards and the HIERARCH convention are out of scope.

use super::{FitsError, Result};
use std::collections::HashMap;
use std::str;

pub const CARD_SIZE: usize = 80;
pub const BLOCK_SIZE: usize = 2880;

const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// A parsed header keyword value.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Str(String),
}

impl KeywordValue {
    pub fn as_logical(&self) -> Option<bool> {
        match self {
            Self::Logical(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keyword {
    pub name: String,
    pub value: Option<KeywordValue>,
}

/// One HDU header, with keyword lookup by name.
#[derive(Debug, Clone, Default)]
pub struct Header {
    keywords: Vec<Keyword>,
    keyword_index: HashMap<String, usize>,
}

impl Header {
    /// Parse a header starting at `offset` in `data`.
    ///
    /// Consumes whole 2880-byte blocks until the `END` card and returns the
    /// header together with the number of bytes consumed (always a multiple
    /// of the block size).
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut header = Header::default();
        let mut pos = offset;

        loop {
            if data.len().saturating_sub(pos) < BLOCK_SIZE {
                return Err(FitsError::UnexpectedEof);
            }
            let block = &data[pos..pos + BLOCK_SIZE];
            pos += BLOCK_SIZE;

            for i in 0..CARDS_PER_BLOCK {
                let card = &block[i * CARD_SIZE..(i + 1) * CARD_SIZE];
                // ASCII-only guarantees the fixed-column slicing below is safe.
                let card_str = match str::from_utf8(card) {
                    Ok(s) if card.is_ascii() => s,
                    _ => {
                        return Err(FitsError::InvalidFormat(
                            "Non-ASCII bytes in header card".to_string(),
                        ))
                    }
                };

                let name = card_str[0..8].trim_end().to_string();
                if name == "END" {
                    return Ok((header, pos - offset));
                }
                if name.is_empty() || name == "COMMENT" || name == "HISTORY" {
                    continue;
                }

                let value = if &card_str[8..10] == "= " {
                    Some(parse_value(&name, &card_str[10..])?)
                } else {
                    None
                };
                header.add_keyword(Keyword { name, value });
            }
        }
    }

    pub fn add_keyword(&mut self, keyword: Keyword) {
        let index = self.keywords.len();
        self.keyword_index.insert(keyword.name.clone(), index);
        self.keywords.push(keyword);
    }

    pub fn get_keyword(&self, name: &str) -> Option<&Keyword> {
        self.keyword_index
            .get(name)
            .and_then(|&index| self.keywords.get(index))
    }

    pub fn get_keyword_value(&self, name: &str) -> Option<&KeywordValue> {
        self.get_keyword(name)?.value.as_ref()
    }

    pub fn logical(&self, name: &str) -> Option<bool> {
        self.get_keyword_value(name)?.as_logical()
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get_keyword_value(name)?.as_integer()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get_keyword_value(name)?.as_string()
    }

    /// Like [`Header::integer`] but missing keywords are an error.
    pub fn require_integer(&self, name: &str) -> Result<i64> {
        self.integer(name).ok_or_else(|| FitsError::KeywordNotFound {
            keyword: name.to_string(),
        })
    }

    pub fn is_primary(&self) -> bool {
        self.logical("SIMPLE").unwrap_or(false)
    }

    /// Size in bytes of the data area following this header, padded to
    /// whole 2880-byte blocks.
    ///
    /// Computed from `BITPIX`, `NAXIS`/`NAXISn` and, for extensions,
    /// `PCOUNT` and `GCOUNT`. A header with `NAXIS = 0` has no data area.
    /// Negative axis lengths and sizes that overflow the address space are
    /// rejected; declared sizes are untrusted input.
    pub fn data_size(&self) -> Result<usize> {
        let naxis = self.checked_dimension("NAXIS")?;
        if naxis == 0 {
            return Ok(0);
        }
        // The standard caps NAXIS at 999.
        if naxis > 999 {
            return Err(FitsError::InvalidKeywordValue {
                keyword: "NAXIS".to_string(),
                value: naxis.to_string(),
            });
        }

        let bitpix = self.require_integer("BITPIX")?;
        let mut elements: u64 = 1;
        for axis in 1..=naxis {
            let n = self.checked_dimension(&format!("NAXIS{axis}"))?;
            elements = elements.checked_mul(n).ok_or_else(overflow_error)?;
        }

        let pcount = match self.get_keyword("PCOUNT") {
            Some(_) => self.checked_dimension("PCOUNT")?,
            None => 0,
        };
        let gcount = match self.get_keyword("GCOUNT") {
            Some(_) => self.checked_dimension("GCOUNT")?,
            None => 1,
        };

        let bytes = (bitpix.unsigned_abs() / 8)
            .checked_mul(gcount)
            .and_then(|b| elements.checked_add(pcount).and_then(|e| b.checked_mul(e)))
            .ok_or_else(overflow_error)?;

        let padded = bytes
            .div_ceil(BLOCK_SIZE as u64)
            .checked_mul(BLOCK_SIZE as u64)
            .ok_or_else(overflow_error)?;
        usize::try_from(padded).map_err(|_| overflow_error())
    }

    /// Read a size-like keyword, rejecting negative values.
    fn checked_dimension(&self, name: &str) -> Result<u64> {
        let value = self.require_integer(name)?;
        u64::try_from(value).map_err(|_| FitsError::InvalidKeywordValue {
            keyword: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn overflow_error() -> FitsError {
    FitsError::InvalidFormat("Declared data area size overflows".to_string())
}

fn parse_value(keyword: &str, field: &str) -> Result<KeywordValue> {
    let field = field.trim_start();

    if let Some(rest) = field.strip_prefix('\'') {
        return parse_string_value(rest);
    }

    // Strip any trailing comment before interpreting the value.
    let value = match field.find('/') {
        Some(slash) => field[..slash].trim(),
        None => field.trim(),
    };

    match value {
        "T" => Ok(KeywordValue::Logical(true)),
        "F" => Ok(KeywordValue::Logical(false)),
        _ => {
            if let Ok(v) = value.parse::<i64>() {
                Ok(KeywordValue::Integer(v))
            } else if let Ok(v) = value.parse::<f64>() {
                Ok(KeywordValue::Real(v))
            } else {
                Err(FitsError::InvalidKeywordValue {
                    keyword: keyword.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }
}

/// Parse a quoted string value, with `''` as the escape for a single quote.
/// Trailing spaces inside the quotes are not significant.
fn parse_string_value(rest: &str) -> Result<KeywordValue> {
    let mut out = String::new();
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        if c == '\'' {
            match chars.clone().next() {
                Some('\'') => {
                    chars.next();
                    out.push('\'');
                }
                _ => return Ok(KeywordValue::Str(out.trim_end().to_string())),
            }
        } else {
            out.push(c);
        }
    }

    Err(FitsError::InvalidFormat(
        "Unterminated string in header card".to_string(),
    ))
}

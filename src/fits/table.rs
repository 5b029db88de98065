//! Binary table (`BINTABLE`) extension reading.
//!
//! [`BinaryTable::parse`] walks the primary HDU, locates the first extension
//! and captures its row data together with the field layout described by the
//! `TTYPEn`/`TFORMn` keywords. Columns are decoded on demand, by name, so a
//! table with exotic columns can still be read as long as the requested
//! columns are scalar.

use super::header::{Header, BLOCK_SIZE};
use super::{FitsError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Scalar element type of a binary table field, from the `TFORMn` type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `L` — logical, 1 byte.
    Logical,
    /// `B` — unsigned byte.
    Byte,
    /// `I` — 16-bit signed integer.
    Short,
    /// `J` — 32-bit signed integer.
    Long,
    /// `K` — 64-bit signed integer.
    LongLong,
    /// `E` — 32-bit IEEE float.
    Float,
    /// `D` — 64-bit IEEE float.
    Double,
    /// `A` — ASCII character; the repeat count is the string width.
    Char,
    /// Any other standard type code. The field still occupies its declared
    /// width in the row, but typed access is refused.
    Unsupported(char),
}

impl FieldType {
    fn from_code(code: char) -> FieldType {
        match code {
            'L' => FieldType::Logical,
            'B' => FieldType::Byte,
            'I' => FieldType::Short,
            'J' => FieldType::Long,
            'K' => FieldType::LongLong,
            'E' => FieldType::Float,
            'D' => FieldType::Double,
            'A' => FieldType::Char,
            other => FieldType::Unsupported(other),
        }
    }

    /// Width in bytes of `repeat` elements of this type.
    fn width(&self, repeat: usize) -> Result<usize> {
        let element: usize = match self {
            FieldType::Logical | FieldType::Byte | FieldType::Char => 1,
            FieldType::Short => 2,
            FieldType::Long | FieldType::Float => 4,
            FieldType::LongLong | FieldType::Double => 8,
            FieldType::Unsupported(code) => match code {
                // Bit arrays pack 8 bits per byte.
                'X' => return Ok(repeat.div_ceil(8)),
                'C' => 8,
                'M' => 16,
                'P' => 8,
                'Q' => 16,
                _ => return Err(FitsError::InvalidTform(format!("{repeat}{code}"))),
            },
        };
        element.checked_mul(repeat).ok_or_else(|| {
            FitsError::InvalidFormat(format!("Field width overflows: repeat count {repeat}"))
        })
    }
}

/// One field of a binary table: name, element type and byte offset into a row.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub tform: String,
    pub ty: FieldType,
    pub repeat: usize,
    pub offset: usize,
}

/// A fully buffered FITS binary table.
#[derive(Debug)]
pub struct BinaryTable {
    fields: Vec<Field>,
    row_len: usize,
    nrows: usize,
    data: Vec<u8>,
}

impl BinaryTable {
    /// Parse a FITS file held in memory and return its first extension as a
    /// binary table.
    ///
    /// # Errors
    /// Returns an error if the primary header is missing or malformed, the
    /// first extension is not a `BINTABLE`, or the data area is shorter than
    /// `NAXIS1 × NAXIS2` bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (primary, consumed) = Header::parse(data, 0)?;
        if !primary.is_primary() {
            return Err(FitsError::InvalidFormat(
                "Primary header missing SIMPLE = T".to_string(),
            ));
        }

        let ext_start = consumed
            .checked_add(primary.data_size()?)
            .ok_or(FitsError::UnexpectedEof)?;
        let (header, header_len) = Header::parse(data, ext_start)?;
        match header.string("XTENSION") {
            Some("BINTABLE") => {}
            Some(other) => {
                return Err(FitsError::InvalidFormat(format!(
                    "Expected BINTABLE extension, found {other}"
                )))
            }
            None => {
                return Err(FitsError::InvalidFormat(
                    "First extension has no XTENSION keyword".to_string(),
                ))
            }
        }

        let row_len = non_negative(&header, "NAXIS1")?;
        let nrows = non_negative(&header, "NAXIS2")?;
        let tfields = non_negative(&header, "TFIELDS")?;

        let mut fields = Vec::with_capacity(tfields);
        let mut offset = 0;
        for i in 1..=tfields {
            let tform = header
                .string(&format!("TFORM{i}"))
                .ok_or_else(|| FitsError::KeywordNotFound {
                    keyword: format!("TFORM{i}"),
                })?
                .to_string();
            let name = header
                .string(&format!("TTYPE{i}"))
                .unwrap_or("")
                .to_string();

            let (repeat, ty) = parse_tform(&tform)?;
            let width = ty.width(repeat)?;
            fields.push(Field {
                name,
                tform,
                ty,
                repeat,
                offset,
            });
            offset = offset.checked_add(width).ok_or_else(|| {
                FitsError::InvalidFormat("TFORM field layout overflows the row".to_string())
            })?;
        }

        if offset > row_len {
            return Err(FitsError::InvalidFormat(format!(
                "TFORM fields occupy {offset} bytes but NAXIS1 is {row_len}"
            )));
        }

        // Header::parse succeeded, so data_start is within the buffer.
        let data_start = ext_start + header_len;
        let data_end = row_len
            .checked_mul(nrows)
            .and_then(|table_bytes| data_start.checked_add(table_bytes))
            .ok_or_else(|| {
                FitsError::InvalidFormat(format!(
                    "Table data area overflows: NAXIS1 = {row_len}, NAXIS2 = {nrows}"
                ))
            })?;
        if data_end > data.len() {
            return Err(FitsError::UnexpectedEof);
        }

        Ok(BinaryTable {
            fields,
            row_len,
            nrows,
            data: data[data_start..data_end].to_vec(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name. FITS column names are matched
    /// case-insensitively, as conventional for header keywords.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    fn scalar_field(&self, name: &str, requested: &'static str) -> Result<&Field> {
        let field = self
            .field(name)
            .ok_or_else(|| FitsError::ColumnNotFound(name.to_string()))?;
        if field.repeat != 1 && field.ty != FieldType::Char {
            return Err(FitsError::ColumnTypeMismatch {
                name: field.name.clone(),
                tform: field.tform.clone(),
                requested,
            });
        }
        Ok(field)
    }

    /// Decode a scalar floating-point column (`E` or `D`).
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>> {
        let field = self.scalar_field(name, "f64")?;
        let decode: fn(&[u8]) -> f64 = match field.ty {
            FieldType::Float => |b| BigEndian::read_f32(b) as f64,
            FieldType::Double => BigEndian::read_f64,
            _ => {
                return Err(FitsError::ColumnTypeMismatch {
                    name: field.name.clone(),
                    tform: field.tform.clone(),
                    requested: "f64",
                })
            }
        };
        Ok(self.cells(field.offset).map(decode).collect())
    }

    /// Decode a scalar integer column (`B`, `I`, `J` or `K`).
    pub fn i64_column(&self, name: &str) -> Result<Vec<i64>> {
        let field = self.scalar_field(name, "i64")?;
        let decode: fn(&[u8]) -> i64 = match field.ty {
            FieldType::Byte => |b| b[0] as i64,
            FieldType::Short => |b| BigEndian::read_i16(b) as i64,
            FieldType::Long => |b| BigEndian::read_i32(b) as i64,
            FieldType::LongLong => BigEndian::read_i64,
            _ => {
                return Err(FitsError::ColumnTypeMismatch {
                    name: field.name.clone(),
                    tform: field.tform.clone(),
                    requested: "i64",
                })
            }
        };
        Ok(self.cells(field.offset).map(decode).collect())
    }

    /// Decode a character column (`rA`), trimming trailing blanks and NULs.
    pub fn string_column(&self, name: &str) -> Result<Vec<String>> {
        let field = self.scalar_field(name, "string")?;
        if field.ty != FieldType::Char {
            return Err(FitsError::ColumnTypeMismatch {
                name: field.name.clone(),
                tform: field.tform.clone(),
                requested: "string",
            });
        }
        let width = field.repeat;
        let offset = field.offset;
        Ok(self
            .cells(offset)
            .map(|cell| {
                let raw = &cell[..width];
                String::from_utf8_lossy(raw)
                    .trim_end_matches(['\0', ' '])
                    .to_string()
            })
            .collect())
    }

    fn cells(&self, offset: usize) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks_exact panics on a zero chunk size; a zero-width table has
        // an empty data area, so chunking it by 1 yields no cells.
        self.data
            .chunks_exact(self.row_len.max(1))
            .map(move |row| &row[offset..])
    }
}

/// Read a header-declared table dimension, rejecting negative values before
/// they can wrap through a cast.
fn non_negative(header: &Header, keyword: &str) -> Result<usize> {
    let value = header.require_integer(keyword)?;
    usize::try_from(value).map_err(|_| FitsError::InvalidKeywordValue {
        keyword: keyword.to_string(),
        value: value.to_string(),
    })
}

fn parse_tform(tform: &str) -> Result<(usize, FieldType)> {
    let tform = tform.trim();
    let split = tform
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| FitsError::InvalidTform(tform.to_string()))?;

    let repeat = if split == 0 {
        1
    } else {
        tform[..split]
            .parse::<usize>()
            .map_err(|_| FitsError::InvalidTform(tform.to_string()))?
    };

    let code = tform[split..]
        .chars()
        .next()
        .ok_or_else(|| FitsError::InvalidTform(tform.to_string()))?;
    Ok((repeat, FieldType::from_code(code)))
}

/// Pad a data area to a whole 2880-byte block with zero bytes, as the
/// standard requires for binary-table data.
pub(crate) fn pad_to_block(buf: &mut Vec<u8>) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK_SIZE - rem, 0);
    }
}

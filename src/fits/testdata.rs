//! Synthetic FITS files for tests.
//!
//! Builds standard-conforming byte streams: an empty primary HDU followed by
//! one `BINTABLE` extension with the given columns, big-endian row data and
//! proper 2880-byte block padding.

use super::header::{BLOCK_SIZE, CARD_SIZE};
use super::table::pad_to_block;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

pub(crate) enum ColumnData {
    Str { width: usize, values: Vec<String> },
    F64(Vec<f64>),
    F32(Vec<f32>),
    I32(Vec<i32>),
    F64Array { repeat: usize, rows: Vec<Vec<f64>> },
}

pub(crate) struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn str(name: &str, width: usize, values: &[&str]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::Str {
                width,
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    pub fn f64(name: &str, values: &[f64]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::F64(values.to_vec()),
        }
    }

    pub fn f32(name: &str, values: &[f32]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::F32(values.to_vec()),
        }
    }

    pub fn i32(name: &str, values: &[i32]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::I32(values.to_vec()),
        }
    }

    pub fn f64_array(name: &str, repeat: usize, rows: &[&[f64]]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::F64Array {
                repeat,
                rows: rows.iter().map(|r| r.to_vec()).collect(),
            },
        }
    }

    fn tform(&self) -> String {
        match &self.data {
            ColumnData::Str { width, .. } => format!("{width}A"),
            ColumnData::F64(_) => "D".to_string(),
            ColumnData::F32(_) => "E".to_string(),
            ColumnData::I32(_) => "J".to_string(),
            ColumnData::F64Array { repeat, .. } => format!("{repeat}D"),
        }
    }

    fn width(&self) -> usize {
        match &self.data {
            ColumnData::Str { width, .. } => *width,
            ColumnData::F64(_) => 8,
            ColumnData::F32(_) => 4,
            ColumnData::I32(_) => 4,
            ColumnData::F64Array { repeat, .. } => repeat * 8,
        }
    }

    fn nrows(&self) -> usize {
        match &self.data {
            ColumnData::Str { values, .. } => values.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::F64Array { rows, .. } => rows.len(),
        }
    }

    fn write_cell(&self, row: usize, out: &mut Vec<u8>) {
        match &self.data {
            ColumnData::Str { width, values } => {
                let mut bytes = values[row].as_bytes().to_vec();
                assert!(bytes.len() <= *width, "string wider than column");
                bytes.resize(*width, b' ');
                out.extend_from_slice(&bytes);
            }
            ColumnData::F64(v) => out.write_f64::<BigEndian>(v[row]).unwrap(),
            ColumnData::F32(v) => out.write_f32::<BigEndian>(v[row]).unwrap(),
            ColumnData::I32(v) => out.write_i32::<BigEndian>(v[row]).unwrap(),
            ColumnData::F64Array { repeat, rows } => {
                assert_eq!(rows[row].len(), *repeat);
                for &v in &rows[row] {
                    out.write_f64::<BigEndian>(v).unwrap();
                }
            }
        }
    }
}

fn card(text: &str) -> Vec<u8> {
    let mut c = text.as_bytes().to_vec();
    assert!(c.len() <= CARD_SIZE, "header card too long: {text}");
    c.resize(CARD_SIZE, b' ');
    c
}

fn int_card(name: &str, value: i64) -> Vec<u8> {
    card(&format!("{name:<8}= {value:>20}"))
}

fn str_card(name: &str, value: &str) -> Vec<u8> {
    card(&format!("{name:<8}= '{value}'"))
}

fn pad_header(buf: &mut Vec<u8>) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK_SIZE - rem, b' ');
    }
}

/// One space-padded 2880-byte header block from literal cards, for
/// malformed-input tests that need full control over the keywords.
pub(crate) fn header_block(cards: &[&str]) -> Vec<u8> {
    let mut buf = Vec::new();
    for c in cards {
        buf.extend_from_slice(&card(c));
    }
    pad_header(&mut buf);
    buf
}

/// An empty primary HDU followed by the given extension header cards and no
/// data area.
pub(crate) fn fits_with_ext_header(ext_cards: &[&str]) -> Vec<u8> {
    let mut buf = header_block(&[
        "SIMPLE  =                    T",
        "BITPIX  =                    8",
        "NAXIS   =                    0",
        "END",
    ]);
    buf.extend_from_slice(&header_block(ext_cards));
    buf
}

/// Serialize columns as a complete FITS file with one `BINTABLE` extension.
pub(crate) fn bintable_fits(columns: &[Column]) -> Vec<u8> {
    let nrows = columns.first().map(|c| c.nrows()).unwrap_or(0);
    for c in columns {
        assert_eq!(c.nrows(), nrows, "ragged columns");
    }
    let row_len: usize = columns.iter().map(|c| c.width()).sum();

    let mut buf = Vec::new();

    // Empty primary HDU.
    buf.extend_from_slice(&card("SIMPLE  =                    T"));
    buf.extend_from_slice(&int_card("BITPIX", 8));
    buf.extend_from_slice(&int_card("NAXIS", 0));
    buf.extend_from_slice(&card("EXTEND  =                    T"));
    buf.extend_from_slice(&card("END"));
    pad_header(&mut buf);

    // Binary table extension header.
    buf.extend_from_slice(&str_card("XTENSION", "BINTABLE"));
    buf.extend_from_slice(&int_card("BITPIX", 8));
    buf.extend_from_slice(&int_card("NAXIS", 2));
    buf.extend_from_slice(&int_card("NAXIS1", row_len as i64));
    buf.extend_from_slice(&int_card("NAXIS2", nrows as i64));
    buf.extend_from_slice(&int_card("PCOUNT", 0));
    buf.extend_from_slice(&int_card("GCOUNT", 1));
    buf.extend_from_slice(&int_card("TFIELDS", columns.len() as i64));
    for (i, c) in columns.iter().enumerate() {
        buf.extend_from_slice(&str_card(&format!("TTYPE{}", i + 1), &c.name));
        buf.extend_from_slice(&str_card(&format!("TFORM{}", i + 1), &c.tform()));
    }
    buf.extend_from_slice(&card("END"));
    pad_header(&mut buf);

    // Row data.
    for row in 0..nrows {
        for c in columns {
            c.write_cell(row, &mut buf);
        }
    }
    pad_to_block(&mut buf);

    buf
}

/// A survey-bricks table with the columns the client extracts.
/// Each entry is `(brickname, ra1, ra2, dec1, dec2)`.
pub(crate) fn brick_catalog_fits(bricks: &[(&str, f64, f64, f64, f64)]) -> Vec<u8> {
    let names: Vec<&str> = bricks.iter().map(|b| b.0).collect();
    let ra1: Vec<f64> = bricks.iter().map(|b| b.1).collect();
    let ra2: Vec<f64> = bricks.iter().map(|b| b.2).collect();
    let dec1: Vec<f64> = bricks.iter().map(|b| b.3).collect();
    let dec2: Vec<f64> = bricks.iter().map(|b| b.4).collect();

    bintable_fits(&[
        Column::str("brickname", 8, &names),
        Column::f64("ra1", &ra1),
        Column::f64("ra2", &ra2),
        Column::f64("dec1", &dec1),
        Column::f64("dec2", &dec2),
    ])
}

/// Gzip-compress a byte stream, as the brick lists are served.
pub(crate) fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

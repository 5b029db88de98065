//! Brick lookup: map a sky coordinate to the survey tile containing it.
//!
//! The Legacy Surveys tile the sky into rectangular "bricks", published per
//! data release as one boundary table per processing hemisphere. Lookup is a
//! linear scan in catalog order with the first matching box winning; this is
//! a cold, one-shot client operation over a table fetched per query, so no
//! spatial index is kept.

use crate::fits::{self, BinaryTable};
use std::fmt;

/// One of the two independent processing partitions of the sky coverage.
///
/// North is always consulted before south when resolving a region query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// The label used in service URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }

    /// Both hemispheres in resolution order.
    pub const ALL: [Hemisphere; 2] = [Hemisphere::North, Hemisphere::South];
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sky coordinate in degrees.
///
/// No range normalization is applied; values outside `[0, 360)` × `[-90, 90]`
/// simply match no brick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    /// Right ascension, degrees.
    pub ra: f64,
    /// Declination, degrees.
    pub dec: f64,
}

impl QueryPoint {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// One sky tile from a survey-bricks boundary table.
///
/// Bounds are assumed ordered (`ra1 <= ra2`, `dec1 <= dec2`) as published;
/// this is not enforced. Boxes in a catalog may overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    /// Unique brick identifier, e.g. `0001m002`.
    pub brickname: String,
    /// Lower right-ascension bound, degrees.
    pub ra1: f64,
    /// Upper right-ascension bound, degrees.
    pub ra2: f64,
    /// Lower declination bound, degrees.
    pub dec1: f64,
    /// Upper declination bound, degrees.
    pub dec2: f64,
}

impl Brick {
    /// Inclusive bounding-box membership test.
    pub fn contains(&self, point: QueryPoint) -> bool {
        self.ra1 <= point.ra
            && point.ra <= self.ra2
            && self.dec1 <= point.dec
            && point.dec <= self.dec2
    }
}

/// The ordered brick boundary table for one hemisphere and data release.
///
/// Read-only once parsed; constructed per query and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct BrickCatalog {
    bricks: Vec<Brick>,
}

impl BrickCatalog {
    pub fn new(bricks: Vec<Brick>) -> Self {
        Self { bricks }
    }

    /// Extract a catalog from a parsed survey-bricks binary table.
    ///
    /// # Errors
    /// Returns an error if any of the `brickname`, `ra1`, `ra2`, `dec1`,
    /// `dec2` columns is missing or has an unexpected type.
    pub fn from_table(table: &BinaryTable) -> fits::Result<Self> {
        let brickname = table.string_column("brickname")?;
        let ra1 = table.f64_column("ra1")?;
        let ra2 = table.f64_column("ra2")?;
        let dec1 = table.f64_column("dec1")?;
        let dec2 = table.f64_column("dec2")?;

        let bricks = brickname
            .into_iter()
            .zip(ra1)
            .zip(ra2)
            .zip(dec1)
            .zip(dec2)
            .map(|((((brickname, ra1), ra2), dec1), dec2)| Brick {
                brickname,
                ra1,
                ra2,
                dec1,
                dec2,
            })
            .collect();

        Ok(Self { bricks })
    }

    /// Find the brick containing `point` by linear scan in catalog order.
    ///
    /// If boxes overlap, the earlier-indexed brick wins; that is the only
    /// tie-break. Returns `None` when no box contains the point.
    pub fn find(&self, point: QueryPoint) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.contains(point))
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> + '_ {
        self.bricks.iter()
    }
}

/// Walk an ordered list of candidate catalogs and return the first hit.
///
/// This is the priority fallback chain of a region query: the north catalog
/// is listed first, and a match there ends the walk without touching south.
pub fn locate_brick<'a>(
    point: QueryPoint,
    catalogs: &[(Hemisphere, &'a BrickCatalog)],
) -> Option<(Hemisphere, &'a Brick)> {
    catalogs
        .iter()
        .find_map(|&(hemisphere, catalog)| catalog.find(point).map(|brick| (hemisphere, brick)))
}

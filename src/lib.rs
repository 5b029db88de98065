//! Client for the DESI Legacy Imaging Surveys public data service.
//!
//! The surveys tile the sky into rectangular "bricks", published per data
//! release as one boundary table per processing hemisphere (north/south).
//! A region query resolves the brick containing a coordinate and fetches
//! that brick's per-tile "tractor" source catalog.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`LegacySurvey`] blocking HTTP client, [`TractorFile`] |
//! | [`brick`] | [`Brick`], [`BrickCatalog`], [`QueryPoint`], [`Hemisphere`], [`locate_brick`](brick::locate_brick) |
//! | [`urls`] | Service URL construction |
//! | [`fits`] | Minimal FITS binary-table reading for survey products |
//! | [`validation`] | Error types for the VO validation subsystem |
//!
//! # Quick Start
//!
//! ```no_run
//! use legacysurvey::{LegacySurvey, QueryPoint};
//!
//! # fn main() -> legacysurvey::Result<()> {
//! let client = LegacySurvey::new()?;
//!
//! match client.query_region(QueryPoint::new(167.7, 28.5), 9)? {
//!     Some(tractor) => {
//!         let table = tractor.table()?;
//!         println!("{}: {} sources", tractor.brickname, table.nrows());
//!     }
//!     None => println!("no brick covers that position"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Queries are synchronous and perform no caching: each region query fetches
//! both hemisphere boundary tables, scans north before south, and issues at
//! most one tractor fetch. A position outside the survey footprint is
//! `Ok(None)`, not an error.

pub mod brick;
pub mod client;
pub mod errors;
pub mod fits;
pub mod urls;
pub mod validation;

pub use brick::{Brick, BrickCatalog, Hemisphere, QueryPoint};
pub use client::{LegacySurvey, TractorFile};
pub use errors::{LegacySurveyError, Result};
pub use validation::ValidationError;

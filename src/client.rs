//! Blocking client for the Legacy Surveys file service.
//!
//! A region query is a fixed cascade: fetch the north and south brick
//! boundary tables, scan north then south for the box containing the query
//! point, and on a hit fetch that brick's tractor catalog. At most three
//! blocking HTTP requests per call; no retries, no caching across calls.

use crate::brick::{locate_brick, Brick, BrickCatalog, Hemisphere, QueryPoint};
use crate::errors::{LegacySurveyError, Result};
use crate::fits::BinaryTable;
use crate::urls;
use flate2::read::GzDecoder;
use std::io::Read;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Legacy Surveys public data service.
pub struct LegacySurvey {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl LegacySurvey {
    /// Client against the production service at
    /// [`urls::DEFAULT_BASE_URL`], with a 60 s per-request timeout.
    pub fn new() -> Result<Self> {
        Self::with_base_url(urls::DEFAULT_BASE_URL)
    }

    /// Client against an alternate base URL (mirror or test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("legacysurvey/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse the brick boundary table for one hemisphere.
    ///
    /// # Errors
    /// Transport failures and non-success HTTP statuses propagate unchanged;
    /// a body that fails to gunzip or is not a readable survey-bricks table
    /// is a typed error.
    pub fn query_brick_list(
        &self,
        data_release: u32,
        hemisphere: Hemisphere,
    ) -> Result<BrickCatalog> {
        let url = urls::brick_list_url(&self.base_url, data_release, hemisphere);
        let compressed = self.get_bytes(&url)?;

        let mut raw = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut raw)
            .map_err(LegacySurveyError::Decompress)?;

        let table = BinaryTable::parse(&raw)?;
        Ok(BrickCatalog::from_table(&table)?)
    }

    /// Resolve the brick containing `point` and fetch its tractor file.
    ///
    /// Consults the north catalog first; a hit there ends the search without
    /// scanning south. `Ok(None)` means no brick in either hemisphere
    /// contains the point, and no tractor fetch was attempted — callers must
    /// check for this explicitly.
    pub fn query_region(
        &self,
        point: QueryPoint,
        data_release: u32,
    ) -> Result<Option<TractorFile>> {
        let mut catalogs = Vec::with_capacity(Hemisphere::ALL.len());
        for hemisphere in Hemisphere::ALL {
            catalogs.push((hemisphere, self.query_brick_list(data_release, hemisphere)?));
        }

        let candidates: Vec<(Hemisphere, &BrickCatalog)> =
            catalogs.iter().map(|(h, c)| (*h, c)).collect();
        match locate_brick(point, &candidates) {
            Some((hemisphere, brick)) => {
                self.fetch_tractor(data_release, hemisphere, brick).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Fetch the tractor catalog file for a known brick.
    pub fn fetch_tractor(
        &self,
        data_release: u32,
        hemisphere: Hemisphere,
        brick: &Brick,
    ) -> Result<TractorFile> {
        let url = urls::tractor_url(&self.base_url, data_release, hemisphere, brick);
        let data = self.get_bytes(&url)?;
        Ok(TractorFile {
            brickname: brick.brickname.clone(),
            hemisphere,
            url,
            data,
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LegacySurveyError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// A fetched per-brick tractor catalog, still in wire format.
#[derive(Debug, Clone)]
pub struct TractorFile {
    /// Name of the brick the file belongs to.
    pub brickname: String,
    /// Hemisphere the match came from.
    pub hemisphere: Hemisphere,
    /// The resolved resource URL the bytes were fetched from.
    pub url: String,
    /// Raw FITS bytes as served.
    pub data: Vec<u8>,
}

impl TractorFile {
    /// Parse the source catalog as a FITS binary table.
    ///
    /// # Errors
    /// A file that is not a readable binary table surfaces as a typed error
    /// rather than being silently discarded.
    pub fn table(&self) -> Result<BinaryTable> {
        Ok(BinaryTable::parse(&self.data)?)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

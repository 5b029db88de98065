//! URL construction for the Legacy Surveys data service.
//!
//! Pure string building; deterministic given the same inputs. The service
//! lays files out by data release, hemisphere and the zero-padded integer
//! part of each brick's lower right-ascension bound.

use crate::brick::{Brick, Hemisphere};

/// Production base URL of the Legacy Surveys file service.
pub const DEFAULT_BASE_URL: &str = "https://portal.nersc.gov/cfs/cosmo/data/legacysurvey";

/// URL of the gzipped brick boundary table for one hemisphere.
pub fn brick_list_url(base_url: &str, data_release: u32, hemisphere: Hemisphere) -> String {
    format!(
        "{base}/dr{dr}/{hem}/survey-bricks-dr{dr}-{hem}.fits.gz",
        base = base_url.trim_end_matches('/'),
        dr = data_release,
        hem = hemisphere,
    )
}

/// URL of the per-brick tractor catalog file.
///
/// The directory component is the integer part of the brick's `ra1`,
/// zero-padded to exactly three digits (`1.7` → `001`, `123.9` → `123`).
pub fn tractor_url(
    base_url: &str,
    data_release: u32,
    hemisphere: Hemisphere,
    brick: &Brick,
) -> String {
    format!(
        "{base}/dr{dr}/{hem}/tractor/{ra:03}/tractor-{name}.fits",
        base = base_url.trim_end_matches('/'),
        dr = data_release,
        hem = hemisphere,
        ra = brick.ra1.trunc() as i64,
        name = brick.brickname,
    )
}

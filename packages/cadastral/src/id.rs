//! Cadastral identifier parsing and normalization.
//!
//! Two policies are offered. [`normalize_cadastral_id`] is permissive and
//! hands back unrecognized input unchanged, which suits display paths and
//! user-typed search boxes. [`CadastralId::from_str`] is strict and rejects
//! anything that is not four numeric segments, which suits filter
//! construction.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CadastralError;

/// `district:block:parcel:sub_parcel`, the first two segments at most two
/// digits long.
static CADASTRAL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{1,2}):([0-9]+):([0-9]+)$").expect("valid regex")
});

/// A parsed cadastral identifier with zero padding removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CadastralId {
    /// Cadastral district.
    pub district: String,
    /// Cadastral block within the district.
    pub block: String,
    /// Parcel (quarter) number, often zero-padded in the source.
    pub parcel: String,
    /// Sub-parcel number.
    pub sub_parcel: String,
}

impl CadastralId {
    /// The four segments in order.
    #[must_use]
    pub fn segments(&self) -> [&str; 4] {
        [&self.district, &self.block, &self.parcel, &self.sub_parcel]
    }
}

impl FromStr for CadastralId {
    type Err = CadastralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = CADASTRAL_ID_RE
            .captures(s.trim())
            .ok_or_else(|| CadastralError::MalformedId {
                input: s.to_string(),
            })?;

        let segment = |i: usize| strip_leading_zeros(&caps[i]).to_string();

        Ok(Self {
            district: segment(1),
            block: segment(2),
            parcel: segment(3),
            sub_parcel: segment(4),
        })
    }
}

impl std::fmt::Display for CadastralId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.district, self.block, self.parcel, self.sub_parcel
        )
    }
}

/// Removes leading zeros, keeping a single `"0"` for all-zero segments.
fn strip_leading_zeros(segment: &str) -> &str {
    let stripped = segment.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}

/// Normalizes a cadastral identifier into its canonical unpadded form.
///
/// `"50:41:0030401:1"` becomes `"50:41:30401:1"`. Input that does not look
/// like a cadastral identifier is returned unchanged.
#[must_use]
pub fn normalize_cadastral_id(id: &str) -> String {
    match id.parse::<CadastralId>() {
        Ok(parsed) => parsed.to_string(),
        Err(e) => {
            log::debug!("Leaving cadastral id as-is: {e}");
            id.to_string()
        }
    }
}

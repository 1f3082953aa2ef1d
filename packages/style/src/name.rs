//! Display name normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Matches one or more trailing parenthetical counts, e.g. `" (12)"`.
static COUNT_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\(\d*\))+\s*$").expect("valid regex"));

/// Strips a trailing parenthetical count from a style name.
///
/// `"Zone A (12)"` becomes `"Zone A"`. Names without a trailing count are
/// returned borrowed and unchanged, so applying this twice is the same as
/// applying it once.
#[must_use]
pub fn strip_count_suffix(name: &str) -> Cow<'_, str> {
    COUNT_SUFFIX_RE.replace(name, "")
}

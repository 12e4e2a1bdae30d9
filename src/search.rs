//! Search page URLs carrying the `fitment_pairs` query parameter.

use url::form_urlencoded;

use crate::model::SelectionPair;
use crate::pairs::encode_pairs;

pub const SEARCH_PATH: &str = "/search";
pub const FITMENT_PAIRS_PARAM: &str = "fitment_pairs";

/// `/search?fitment_pairs=1:10,2:55`, or bare `/search` with no selection.
/// Separators are left readable; they are valid in a query string.
pub fn search_url(pairs: &[SelectionPair]) -> String {
    let encoded = encode_pairs(pairs);
    if encoded.is_empty() {
        SEARCH_PATH.to_string()
    } else {
        format!("{}?{}={}", SEARCH_PATH, FITMENT_PAIRS_PARAM, encoded)
    }
}

/// First `fitment_pairs` value in a raw query string (with or without the
/// leading `?`), percent-decoded.
pub fn fitment_pairs_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == FITMENT_PAIRS_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;

//! `fitment_pairs` codec: the ordered selection as one query-safe string.
//!
//! Format: `type:value` pairs joined with `,`, in cascade order, e.g.
//! `1:10,2:55,3:901`. Neither separator needs escaping in a query value.

use crate::model::{DropdownLevel, FitmentTypeId, SelectionPair, ValueId};

pub const PAIR_SEPARATOR: &str = ",";
pub const ID_SEPARATOR: &str = ":";

/// Encodes pairs up to (not including) the first one without a value.
pub fn encode_pairs(pairs: &[SelectionPair]) -> String {
    pairs
        .iter()
        .take_while(|p| !p.type_id.is_unset() && !p.value_id.is_unset())
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(PAIR_SEPARATOR)
}

/// The contiguous prefix of selected levels. Stops at the first gap even if
/// later levels carry a selection.
pub fn selected_prefix(levels: &[DropdownLevel]) -> Vec<SelectionPair> {
    levels.iter().map_while(|l| l.selection()).collect()
}

pub fn encode_levels(levels: &[DropdownLevel]) -> String {
    encode_pairs(&selected_prefix(levels))
}

/// Best-effort decode. Segments that are not exactly two positive integers
/// are dropped; the rest keep their order.
pub fn decode_pairs(s: &str) -> Vec<SelectionPair> {
    s.split(PAIR_SEPARATOR).filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<SelectionPair> {
    let mut parts = segment.trim().split(ID_SEPARATOR);
    let type_id = parts.next()?.trim().parse::<u64>().ok()?;
    let value_id = parts.next()?.trim().parse::<u64>().ok()?;
    if parts.next().is_some() || type_id == 0 || value_id == 0 {
        return None;
    }
    Some(SelectionPair {
        type_id: FitmentTypeId(type_id),
        value_id: ValueId(value_id),
    })
}

/// True when no selected level follows an unselected one.
pub fn is_contiguous(levels: &[DropdownLevel]) -> bool {
    levels
        .windows(2)
        .all(|w| w[0].is_selected() || !w[1].is_selected())
}

#[cfg(test)]
#[path = "tests/pairs_tests.rs"]
mod tests;

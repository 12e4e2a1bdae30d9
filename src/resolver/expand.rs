use super::{Expansion, PendingFetch};
use crate::catalog::{ChildTypesQuery, FitmentCatalog};
use crate::model::{FitmentType, SelectionPair};

/// Fetches the level that follows `fetch.context`: the next child type, then
/// its values constrained by the same context. Never fails; catalog errors
/// are logged and reported as [`Expansion::Failed`].
pub fn expand<C: FitmentCatalog + ?Sized>(catalog: &C, fetch: &PendingFetch) -> Expansion {
    let query = ChildTypesQuery::new(fetch.root_type, fetch.context.clone());
    match catalog.child_types(&query) {
        Ok(types) => expand_with_types(catalog, &fetch.context, types),
        Err(err) => {
            tracing::warn!(
                error = %format!("{:#}", err),
                root = %fetch.root_type,
                level = fetch.level,
                "child type lookup failed"
            );
            Expansion::Failed { fitment_type: None }
        }
    }
}

pub(super) fn expand_with_types<C: FitmentCatalog + ?Sized>(
    catalog: &C,
    context: &[SelectionPair],
    types: Vec<FitmentType>,
) -> Expansion {
    let Some(next) = next_type(types, context) else {
        return Expansion::Terminal;
    };
    match catalog.fitment_values(next.id, context) {
        Ok(values) => Expansion::Next {
            fitment_type: next,
            values,
        },
        Err(err) => {
            tracing::warn!(
                error = %format!("{:#}", err),
                type_id = %next.id,
                "fitment value lookup failed"
            );
            Expansion::Failed {
                fitment_type: Some(next),
            }
        }
    }
}

/// Lowest position wins, then backend order. Types already resolved upstream
/// are skipped so a misbehaving backend cannot repeat a level.
pub(super) fn next_type(types: Vec<FitmentType>, context: &[SelectionPair]) -> Option<FitmentType> {
    types
        .into_iter()
        .enumerate()
        .filter(|(_, t)| !context.iter().any(|p| p.type_id == t.id))
        .min_by_key(|(i, t)| (t.position.unwrap_or(u32::MAX), *i))
        .map(|(_, t)| t)
}

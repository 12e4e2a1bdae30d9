use super::expand::{expand, expand_with_types};
use super::{Expansion, PendingFetch, Resolver};
use crate::catalog::{ChildTypesQuery, FitmentCatalog};
use crate::model::{DropdownLevel, SelectionPair};
use crate::pairs::{decode_pairs, selected_prefix};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restore {
    /// Same pair string as the last replay; nothing was refetched.
    Unchanged,
    /// `restored` of `requested` pairs are selected again. Fewer means the
    /// string was stale past that point.
    Replayed { requested: usize, restored: usize },
}

enum Step {
    Restored(DropdownLevel),
    Stopped(Expansion),
}

impl Resolver {
    /// Rebuilds the cascade from a `fitment_pairs` string by replaying each
    /// pair against the catalog. Replay stops quietly at the first pair the
    /// catalog no longer offers; the level after the last restored pair is
    /// fetched as usual so the shopper can continue from there.
    pub fn initialize_from_pairs<C: FitmentCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        pairs: &str,
    ) -> Restore {
        if self.restored_from.as_deref() == Some(pairs) {
            return Restore::Unchanged;
        }

        let decoded = decode_pairs(pairs);
        if self.root_types.is_empty() {
            self.load_root_types(catalog);
        }
        let Some(root) = self
            .selected_root
            .or_else(|| self.root_types.first().map(|r| r.id))
        else {
            tracing::warn!("no root types available; fitment selection not restored");
            return Restore::Replayed {
                requested: decoded.len(),
                restored: 0,
            };
        };

        self.restored_from = Some(pairs.to_string());
        let mut fetch = self.begin_root(root);
        let mut stopped = None;
        for pair in &decoded {
            match restore_level(catalog, &fetch, *pair) {
                Step::Restored(level) => {
                    self.levels.push(level);
                    let context = selected_prefix(&self.levels);
                    fetch = self.next_ticket(root, context);
                }
                Step::Stopped(expansion) => {
                    tracing::info!(
                        pair = %pair,
                        level = fetch.level,
                        "fitment pairs stale past this point; restore stopped"
                    );
                    stopped = Some(expansion);
                    break;
                }
            }
        }

        let restored = self.levels.len();
        let expansion = match stopped {
            Some(e) => e,
            None => expand(catalog, &fetch),
        };
        self.apply_expansion(&fetch, expansion);

        Restore::Replayed {
            requested: decoded.len(),
            restored,
        }
    }
}

fn restore_level<C: FitmentCatalog + ?Sized>(
    catalog: &C,
    fetch: &PendingFetch,
    pair: SelectionPair,
) -> Step {
    let query = ChildTypesQuery::new(fetch.root_type, fetch.context.clone());
    let types = match catalog.child_types(&query) {
        Ok(types) => types,
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), level = fetch.level, "child type lookup failed");
            return Step::Stopped(Expansion::Failed { fitment_type: None });
        }
    };

    let offered = types
        .iter()
        .filter(|t| !fetch.context.iter().any(|p| p.type_id == t.id))
        .find(|t| t.id == pair.type_id)
        .cloned();
    let Some(ty) = offered else {
        return Step::Stopped(expand_with_types(catalog, &fetch.context, types));
    };

    let values = match catalog.fitment_values(ty.id, &fetch.context) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), type_id = %ty.id, "fitment value lookup failed");
            return Step::Stopped(Expansion::Failed {
                fitment_type: Some(ty),
            });
        }
    };

    let mut level = DropdownLevel::new(ty, values);
    if level.find_value(pair.value_id).is_none() {
        return Step::Stopped(Expansion::Next {
            fitment_type: level.fitment_type,
            values: level.values,
        });
    }
    level.select(pair.value_id, "");
    Step::Restored(level)
}

use crate::reconciliation::domain::{IdentityMatch, RegistryRef};
use std::collections::BTreeMap;

/// IdentitySelector - picks the authoritative registry entity among candidates
///
/// The registry may hold several entities with the same human-readable name
/// coming from unrelated ecosystems (`json` on npm and on PyPI). Candidates are
/// bucketed by purl cardinality, the number of purls recorded on the entity,
/// and the richest bucket wins.
///
/// Within a bucket the last candidate seen replaces the previous one, unless
/// the previous one carries the queried name with exact casing and the newer
/// one only matches case-insensitively.
pub struct IdentitySelector;

impl IdentitySelector {
    /// Selects among candidates returned by an external-id search for `name`
    ///
    /// Candidates sharing the queried name (case-insensitive) are preferred;
    /// when none does, every candidate is considered since the purl search
    /// already tied them to the component.
    ///
    /// Within a cardinality bucket the last candidate wins, except that a
    /// candidate already selected with the exact queried casing is not
    /// replaced by a later case-insensitive match. That is the only case in
    /// which an already-selected candidate is kept; the first candidate is
    /// not pinned in general.
    pub fn select(name: &str, candidates: Vec<RegistryRef>) -> IdentityMatch {
        if candidates.is_empty() {
            return IdentityMatch::none();
        }

        let (named, others): (Vec<RegistryRef>, Vec<RegistryRef>) = candidates
            .into_iter()
            .partition(|c| c.name.eq_ignore_ascii_case(name));
        let pool = if named.is_empty() { others } else { named };
        let ambiguous = pool.len() > 1;

        let mut buckets: BTreeMap<usize, RegistryRef> = BTreeMap::new();
        for candidate in pool {
            let cardinality = Self::cardinality(&candidate);
            let keep_existing = buckets
                .get(&cardinality)
                .is_some_and(|existing| existing.name == name && candidate.name != name);
            if !keep_existing {
                buckets.insert(cardinality, candidate);
            }
        }

        let selected = buckets.into_iter().next_back().map(|(_, candidate)| candidate);
        let exists = selected
            .as_ref()
            .is_some_and(|candidate| candidate.external_ids.has_purl());

        IdentityMatch {
            exists,
            reference: selected,
            ambiguous,
            conflicting_package_type: false,
        }
    }

    /// Number of purls recorded on a candidate; undecodable values count as one
    pub fn cardinality(candidate: &RegistryRef) -> usize {
        candidate
            .external_ids
            .recorded_purls()
            .map_or(0, |purls| purls.cardinality())
    }
}

use crate::reconciliation::domain::purl::{is_debian_purl, purl_type_of, Purl};
use crate::reconciliation::domain::{ExternalIdValue, ExternalIds, PURL_ID_KEY};

/// Result of merging a purl into an entity's external ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub external_ids: ExternalIds,
    /// The purl was already recorded; no update is needed
    pub already_present: bool,
}

/// ExternalIdMerger - adds a purl to a registry entity without losing earlier ones
///
/// Merge rules, applied to the `purl_id` key:
/// 1. no external ids at all: `{purl_id: <purl>}`
/// 2. other keys but no `purl_id`: add `purl_id` as a bare string, other keys untouched
/// 3. `purl_id` holds the purl (bare or inside the array): unchanged, already present
/// 4. otherwise: the value is normalized to array form and the purl appended
///
/// A `purl_id` value that cannot be decoded is reported as already present so
/// that an unknown format is never overwritten.
pub struct ExternalIdMerger;

impl ExternalIdMerger {
    /// Merges a purl into component-level external ids
    pub fn merge(existing: &ExternalIds, new_purl: &str) -> MergeOutcome {
        Self::merge_with(existing, new_purl, |value, purl| value.contains(purl))
    }

    /// Merges a purl into release-level external ids
    ///
    /// Debian release purls are stored percent-encoded by older runs, so both
    /// sides are decoded before the containment check.
    pub fn merge_release(existing: &ExternalIds, new_purl: &str) -> MergeOutcome {
        if is_debian_purl(new_purl) {
            Self::merge_with(existing, new_purl, |value, purl| value.contains_decoded(purl))
        } else {
            Self::merge(existing, new_purl)
        }
    }

    fn merge_with(
        existing: &ExternalIds,
        new_purl: &str,
        contains: impl Fn(&ExternalIdValue, &str) -> bool,
    ) -> MergeOutcome {
        let mut external_ids = existing.clone();

        let current = match existing.get(PURL_ID_KEY) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                external_ids.insert(PURL_ID_KEY, new_purl);
                return MergeOutcome {
                    external_ids,
                    already_present: false,
                };
            }
        };

        let Ok(decoded) = ExternalIdValue::decode(current) else {
            return MergeOutcome {
                external_ids,
                already_present: true,
            };
        };

        if contains(&decoded, new_purl) {
            return MergeOutcome {
                external_ids,
                already_present: true,
            };
        }

        external_ids.insert(PURL_ID_KEY, decoded.push(new_purl.to_string()).encode());
        MergeOutcome {
            external_ids,
            already_present: false,
        }
    }

    /// Detects an entity whose recorded purls all belong to another package type
    ///
    /// # Returns
    /// The recorded package type when it differs from the type of `new_purl`;
    /// `None` when types agree, nothing is recorded, or types cannot be read
    pub fn detect_type_conflict(existing: &ExternalIds, new_purl: &str) -> Option<String> {
        let new_type = purl_type_of(new_purl)?;
        let recorded = existing.recorded_purls()?;
        let recorded_types: Vec<String> = recorded
            .purls()
            .iter()
            .filter_map(|p| purl_type_of(p))
            .collect();

        if recorded_types.is_empty() || recorded_types.contains(&new_type) {
            return None;
        }
        recorded_types.into_iter().next()
    }

    /// Detects an entity that records another package of the same type
    ///
    /// Catches entities registered under a bare name that collides with a
    /// scoped or grouped package (`animations` vs `@angular/animations`).
    ///
    /// # Returns
    /// The first recorded purl of the same type naming a different package;
    /// `None` when every recorded purl names this package or cannot be parsed
    pub fn detect_package_conflict(existing: &ExternalIds, new_purl: &str) -> Option<String> {
        let new_purl = Purl::parse(new_purl).ok()?;
        let recorded = existing.recorded_purls()?;
        recorded
            .purls()
            .iter()
            .filter_map(|raw| Purl::parse(raw).ok())
            .find(|p| p.purl_type() == new_purl.purl_type() && !p.same_package(&new_purl))
            .map(|p| p.as_str().to_string())
    }
}

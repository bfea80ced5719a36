use crate::reconciliation::domain::{
    ArtifactMatch, ArtifactRecord, Component, Ecosystem, MatchConfidence,
};
use crate::reconciliation::policies::RepoPriority;

/// File extensions accepted for Debian binary and source-control artifacts
const DEBIAN_EXTENSIONS: [&str; 6] = [".deb", ".dsc", ".tar.gz", ".tar.xz", ".tar.bz2", ".diff.gz"];

/// ArtifactMatcher - decides which artifact record denotes a component
///
/// Matching runs in two tiers:
/// 1. Records exposing the ecosystem's identity properties match only on exact
///    property equality. Such records never fall through to file name rules.
/// 2. Remaining records are tested with the ecosystem's file name or path rule,
///    and the result is flagged as [`MatchConfidence::Heuristic`].
///
/// When the winning tier spans several repositories, [`RepoPriority`] picks the
/// repository; within it the first record in input order wins.
pub struct ArtifactMatcher;

impl ArtifactMatcher {
    /// Matches `component` against `records`
    ///
    /// # Returns
    /// The matched repo name, package file name and repo path, or the
    /// "not found" sentinels when no record satisfies the rules
    pub fn find_match(records: &[ArtifactRecord], component: &Component) -> ArtifactMatch {
        let ecosystem = component.ecosystem();
        let identity_keys = ecosystem.identity_properties();

        let confirmed: Vec<&ArtifactRecord> = match identity_keys {
            Some(keys) => records
                .iter()
                .filter(|r| Self::matches_properties(r, component, ecosystem, keys))
                .collect(),
            None => Vec::new(),
        };
        if !confirmed.is_empty() {
            return Self::select(&confirmed, MatchConfidence::Property);
        }

        let heuristic: Vec<&ArtifactRecord> = records
            .iter()
            .filter(|r| !identity_keys.is_some_and(|(name_key, _)| r.has_property(name_key)))
            .filter(|r| Self::matches_heuristic(r, component, ecosystem))
            .collect();
        if !heuristic.is_empty() {
            return Self::select(&heuristic, MatchConfidence::Heuristic);
        }

        ArtifactMatch::not_found()
    }

    fn select(matches: &[&ArtifactRecord], confidence: MatchConfidence) -> ArtifactMatch {
        let repo = RepoPriority::select_repo(matches);
        matches
            .iter()
            .find(|r| r.repo == repo)
            .map(|r| ArtifactMatch::found(r, confidence))
            .unwrap_or_else(ArtifactMatch::not_found)
    }

    fn matches_properties(
        record: &ArtifactRecord,
        component: &Component,
        ecosystem: Ecosystem,
        (name_key, version_key): (&str, &str),
    ) -> bool {
        let name_matches = record
            .property_values(name_key)
            .any(|value| Self::property_name_equals(value, component, ecosystem));
        let version_matches = record.property_values(version_key).any(|value| {
            value == component.version() || value == component.version_without_epoch()
        });
        name_matches && version_matches
    }

    fn property_name_equals(value: &str, component: &Component, ecosystem: Ecosystem) -> bool {
        match ecosystem {
            Ecosystem::PyPi => normalize_pypi_name(value) == normalize_pypi_name(component.name()),
            Ecosystem::NuGet | Ecosystem::Choco => value.eq_ignore_ascii_case(component.name()),
            Ecosystem::Npm => value == component.registry_name(),
            _ => value == component.name(),
        }
    }

    fn matches_heuristic(record: &ArtifactRecord, component: &Component, ecosystem: Ecosystem) -> bool {
        match ecosystem {
            Ecosystem::Debian => Self::matches_debian(record, component),
            Ecosystem::Npm => Self::matches_npm(record, component),
            Ecosystem::Cargo => {
                record.name == format!("{}-{}.crate", component.name(), component.version())
            }
            Ecosystem::PyPi => Self::matches_pypi(record, component),
            Ecosystem::Maven => Self::matches_maven(record, component),
            Ecosystem::NuGet => Self::matches_nupkg(record, component),
            Ecosystem::Conan => path_contains_segments(&record.path, component.name(), component.version()),
            Ecosystem::Choco => {
                path_contains_segments(&record.path, component.name(), component.version())
                    || Self::matches_nupkg(record, component)
            }
            Ecosystem::Unknown => {
                let prefix = format!("{}-{}.", component.name(), component.version());
                record.name.starts_with(&prefix)
            }
        }
    }

    /// `{name}_{version}` prefix followed by an architecture or extension separator
    fn matches_debian(record: &ArtifactRecord, component: &Component) -> bool {
        let prefix = format!("{}_{}", component.name(), component.version_without_epoch());
        let Some(rest) = record.name.strip_prefix(&prefix) else {
            return false;
        };
        (rest.starts_with('_') || rest.starts_with('.'))
            && DEBIAN_EXTENSIONS.iter().any(|ext| record.name.ends_with(ext))
    }

    /// `{name}-{version}.tgz`, tolerating the scope joined by `-` in the file name
    /// or by `/` in the path
    fn matches_npm(record: &ArtifactRecord, component: &Component) -> bool {
        let full_name = component.registry_name();
        let version = component.version();

        match full_name.split_once('/') {
            Some((scope, bare)) => {
                let scope = scope.trim_start_matches('@');
                let in_scope_dir = record.path.trim_start_matches('/').starts_with(&*full_name)
                    && record.name == format!("{}-{}.tgz", bare, version);
                let scope_joined = [
                    format!("{}-{}-{}.tgz", scope, bare, version),
                    format!("@{}-{}-{}.tgz", scope, bare, version),
                ]
                .contains(&record.name);
                in_scope_dir || scope_joined
            }
            None => {
                !record.path.trim_start_matches('/').starts_with('@')
                    && record.name == format!("{}-{}.tgz", full_name, version)
            }
        }
    }

    /// sdist (`name-version.tar.gz`) or wheel (`name_version-...whl`), case-insensitive
    fn matches_pypi(record: &ArtifactRecord, component: &Component) -> bool {
        let file_name = record.name.to_lowercase();
        let normalized = normalize_pypi_name(component.name());
        let version = component.version().to_lowercase();

        [normalized.clone(), normalized.replace('-', "_")]
            .iter()
            .any(|candidate| {
                file_name
                    .strip_prefix(&format!("{}-{}", candidate, version))
                    .is_some_and(|rest| {
                        rest.starts_with(".tar") || rest.starts_with(".zip") || rest.starts_with('-')
                    })
            })
    }

    /// `{artifact}-{version}.jar` or `-sources.jar`, under the group's path when known
    fn matches_maven(record: &ArtifactRecord, component: &Component) -> bool {
        let (group, artifact) = maven_coordinates(component);
        let version = component.version();

        let file_matches = [
            format!("{}-{}.jar", artifact, version),
            format!("{}-{}-sources.jar", artifact, version),
        ]
        .contains(&record.name);
        if !file_matches {
            return false;
        }

        match group {
            Some(group) => {
                let expected = format!("{}/{}/{}", group.replace('.', "/"), artifact, version);
                format!("/{}/", record.path.trim_matches('/')).contains(&format!("/{}/", expected))
            }
            None => true,
        }
    }

    fn matches_nupkg(record: &ArtifactRecord, component: &Component) -> bool {
        record
            .name
            .eq_ignore_ascii_case(&format!("{}.{}.nupkg", component.name(), component.version()))
    }
}

/// PEP 503 name normalization: lowercase, runs of `-`, `_`, `.` collapse to `-`
fn normalize_pypi_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut previous_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !previous_separator {
                normalized.push('-');
            }
            previous_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            previous_separator = false;
        }
    }
    normalized
}

/// (group, artifact) from the group field, purl namespace or a `group:artifact` name
fn maven_coordinates(component: &Component) -> (Option<&str>, &str) {
    let name = component.name();
    if let Some(group) = component.group().or(component.purl().namespace()) {
        let artifact = name.rsplit(':').next().unwrap_or(name);
        return (Some(group), artifact);
    }
    match name.split_once(':') {
        Some((group, artifact)) => (Some(group), artifact),
        None => (None, name),
    }
}

/// Whether `name/version/` appears as consecutive segments of `path`
fn path_contains_segments(path: &str, name: &str, version: &str) -> bool {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.windows(2).any(|w| w[0] == name && w[1] == version)
}

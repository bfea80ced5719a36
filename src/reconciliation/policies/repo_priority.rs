use crate::reconciliation::domain::artifact::{ArtifactRecord, REPO_NOT_FOUND};
use std::borrow::Borrow;

/// RepoPriority policy for choosing one repository among several matches
///
/// Release and dev-dependency repositories are curated locations, so they win
/// over generic caches. Repo names are compared case-insensitively.
///
/// Priority order:
/// 1. repo name containing "release"
/// 2. repo name containing "devdep"
/// 3. repo name containing "dev"
/// 4. first record in list order
pub struct RepoPriority;

impl RepoPriority {
    const PREFERRED_MARKERS: [&'static str; 3] = ["release", "devdep", "dev"];

    /// Selects the repo name for records already known to match one component
    ///
    /// # Returns
    /// The selected repo name, or `"Not Found in JFrogRepo"` for an empty list
    pub fn select_repo<R: Borrow<ArtifactRecord>>(records: &[R]) -> String {
        let repos: Vec<&str> = records
            .iter()
            .map(|r| Borrow::<ArtifactRecord>::borrow(r).repo.as_str())
            .collect();

        Self::PREFERRED_MARKERS
            .iter()
            .find_map(|marker| {
                repos
                    .iter()
                    .find(|repo| repo.to_lowercase().contains(marker))
            })
            .or_else(|| repos.first())
            .map(|repo| repo.to_string())
            .unwrap_or_else(|| REPO_NOT_FOUND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(repos: &[&str]) -> Vec<ArtifactRecord> {
        repos
            .iter()
            .map(|repo| ArtifactRecord::new("pkg-1.0.tgz", "pkg/-", *repo))
            .collect()
    }

    #[test]
    fn test_select_repo_prefers_release() {
        let records = records(&["x-dev", "y-release", "z"]);
        assert_eq!(RepoPriority::select_repo(&records), "y-release");
    }

    #[test]
    fn test_select_repo_is_deterministic() {
        let records = records(&["x-dev", "y-release", "z"]);
        let first = RepoPriority::select_repo(&records);
        for _ in 0..5 {
            assert_eq!(RepoPriority::select_repo(&records), first);
        }
    }

    #[test]
    fn test_select_repo_devdep_before_dev() {
        let records = records(&["npm-dev", "npm-devdep", "npm-remote"]);
        assert_eq!(RepoPriority::select_repo(&records), "npm-devdep");
    }

    #[test]
    fn test_select_repo_dev_before_plain() {
        let records = records(&["npm-remote", "npm-dev-egll"]);
        assert_eq!(RepoPriority::select_repo(&records), "npm-dev-egll");
    }

    #[test]
    fn test_select_repo_case_insensitive() {
        let records = records(&["cache", "Maven-RELEASE-local"]);
        assert_eq!(RepoPriority::select_repo(&records), "Maven-RELEASE-local");
    }

    #[test]
    fn test_select_repo_falls_back_to_first() {
        let records = records(&["pypi-remote", "pypi-cache"]);
        assert_eq!(RepoPriority::select_repo(&records), "pypi-remote");
    }

    #[test]
    fn test_select_repo_empty() {
        assert_eq!(RepoPriority::select_repo::<ArtifactRecord>(&[]), "Not Found in JFrogRepo");
    }

    #[test]
    fn test_select_repo_first_release_wins() {
        let records = records(&["a-release", "b-release"]);
        assert_eq!(RepoPriority::select_repo(&records), "a-release");
    }
}

//! Identifiers used to address Jenkins jobs and builds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Jenkins job path (supports nested items like `folder/job`).
///
/// A path like `a/b` is translated into URL segments: `/job/a/job/b/...`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPath(String);

impl JobPath {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub(crate) fn url_segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .split('/')
            .filter(|segment| !segment.is_empty())
            .flat_map(|segment| ["job", segment])
    }
}

impl From<&str> for JobPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for JobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Jenkins build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildNumber(i64);

impl BuildNumber {
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }
}

impl From<i64> for BuildNumber {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_job_paths_expand_to_job_segments() {
        let job = JobPath::new("team/app//deploy");
        assert_eq!(
            job.url_segments().collect::<Vec<_>>(),
            ["job", "team", "job", "app", "job", "deploy"]
        );
    }
}

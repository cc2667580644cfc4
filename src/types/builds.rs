use crate::BuildNumber;
use serde::{Deserialize, Serialize};

/// Subset of `GET /job/<name>/<build>/api/json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct BuildInfo {
    #[serde(default)]
    pub number: Option<BuildNumber>,
    /// `SUCCESS`, `FAILURE`, `ABORTED`, ...; `null` while the build is running.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub building: bool,
}

impl BuildInfo {
    /// `tree` filter matching the fields above.
    pub(crate) const TREE: &'static str = "number,result,building";

    /// Result string with "no result yet" flattened to `""`.
    #[must_use]
    pub fn result_or_empty(&self) -> &str {
        self.result.as_deref().unwrap_or_default()
    }
}

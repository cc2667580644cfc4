use crate::transport::request::Request;
use crate::{BuildInfo, BuildNumber, Error, JobPath};

fn build_info_request(job: &JobPath, build: BuildNumber) -> Result<Request, Error> {
    let mut segments: Vec<String> = job.url_segments().map(ToOwned::to_owned).collect();
    // Without a job, `/<n>/api/json` addresses some other resource.
    if segments.is_empty() {
        return Err(Error::InvalidConfig {
            message: format!("job path {:?} names no job", job.to_string()).into(),
            source: None,
        });
    }
    segments.push(build.to_string());
    segments.extend(["api", "json"].map(str::to_owned));
    Ok(Request::get(segments).query_pair("tree", BuildInfo::TREE))
}

/// Per-build Jenkins APIs.
#[derive(Clone)]
pub struct BuildsService {
    client: crate::Client,
}

impl BuildsService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    /// `GET /job/<name>/<build>/api/json?tree=number,result,building`
    pub async fn info(
        &self,
        job: impl Into<JobPath>,
        build: impl Into<BuildNumber>,
    ) -> Result<BuildInfo, Error> {
        let job = job.into();
        self.client
            .send_json(build_info_request(&job, build.into())?)
            .await
    }

    /// Result string of a build: `""` while it is still running or queued.
    pub async fn result(
        &self,
        job: impl Into<JobPath>,
        build: impl Into<BuildNumber>,
    ) -> Result<String, Error> {
        let info = self.info(job, build).await?;
        Ok(info.result_or_empty().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_info_request_targets_nested_job() {
        let req = build_info_request(&JobPath::new("folder/app"), BuildNumber::new(42)).unwrap();
        assert_eq!(req.segments, ["job", "folder", "job", "app", "42", "api", "json"]);
        assert_eq!(req.query, [("tree".to_owned(), BuildInfo::TREE.to_owned())]);
    }

    #[test]
    fn empty_job_path_is_rejected_before_sending() {
        for job in ["", "/", "//"] {
            let err = build_info_request(&JobPath::new(job), BuildNumber::new(3)).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{job:?}: {err:?}");
        }
        let err = build_info_request(&JobPath::new(""), BuildNumber::new(3)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: job path \"\" names no job");
    }
}

use crate::Error;
use crate::transport::request::Request;
use serde_json::Value;

/// Jenkins system-level APIs.
#[derive(Clone)]
pub struct SystemService {
    client: crate::Client,
}

impl SystemService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    /// `GET /api/json`
    pub async fn root(&self, tree: Option<&str>) -> Result<Value, Error> {
        let mut req = Request::get(["api", "json"]);
        if let Some(tree) = tree {
            req = req.query_pair("tree", tree);
        }
        self.client.send_json(req).await
    }

    /// Verify the server is reachable and accepts our credentials.
    pub async fn ping(&self) -> Result<(), Error> {
        self.root(Some("mode")).await.map(|_| ())
    }
}

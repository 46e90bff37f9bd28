use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::schemas::{ResultPage, SearchParams};
use crate::search::error::SearchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Boundary to the remote search service. The corpus, indexing and ranking
/// all live behind this trait; the core only hands over a flattened query
/// and receives a result page.
#[async_trait]
pub trait RemoteSearchClient: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<ResultPage, SearchError>;
}

/// HTTP implementation talking to the dashboard's analytics API.
pub struct HttpSearchClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSearchClient {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// Url::join treats a path without a trailing slash as a file and would
// replace its last segment.
fn parse_base_url(raw: &str) -> Result<Url, SearchError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| SearchError::Transport {
        details: format!("invalid base URL {raw:?}: {e}"),
    })
}

#[async_trait]
impl RemoteSearchClient for HttpSearchClient {
    async fn search(&self, params: &SearchParams) -> Result<ResultPage, SearchError> {
        let url = self.base_url.join("search").map_err(|e| SearchError::Transport {
            details: e.to_string(),
        })?;
        debug!(%url, page = params.page, "issuing search request");

        let response = self.http.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                code: status.as_u16(),
            });
        }

        let page = response.json::<ResultPage>().await?;
        Ok(page)
    }
}

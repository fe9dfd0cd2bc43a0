use alertdesk_common::retry::{retry_async, RetryPolicy};
use alertdesk_common::wire::AppValidation;
use async_trait::async_trait;
use reqwest::{Client, Url};

use super::directory::{AppDirectory, DirectoryError};

/// Asks the rules server whether an app id exists.
pub struct HttpDirectory {
    base: Url,
    client: Client,
    retry: RetryPolicy,
}

impl HttpDirectory {
    pub fn new(base: &str) -> Result<Self, DirectoryError> {
        let base = Url::parse(base).map_err(|e| DirectoryError::Transport(format!("invalid server URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(DirectoryError::Transport(format!("invalid server URL: {base}")));
        }
        Ok(Self {
            base,
            client: Client::new(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn validate_url(&self, app_id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "apps", app_id, "validate"]);
        }
        url
    }

    async fn check_once(&self, url: &Url) -> Result<AppValidation, DirectoryError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }
        resp.json::<AppValidation>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AppDirectory for HttpDirectory {
    async fn check(&self, app_id: &str) -> Result<AppValidation, DirectoryError> {
        let url = self.validate_url(app_id);
        tracing::debug!(%url, "checking app id");
        retry_async(&self.retry, DirectoryError::is_transient, || self.check_once(&url)).await
    }
}

use alertdesk_common::wire::{RuleSetRequest, StoredMetric};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde_json::Value;

use super::backend::{Backend, BackendErrorPayload, Operation, SubmitRequest};
use super::record::RuleTarget;

/// Talks to the rules server's REST surface.
pub struct HttpBackend {
    base: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base: &str) -> Result<Self, BackendErrorPayload> {
        let base = Url::parse(base)
            .map_err(|e| BackendErrorPayload::bad_request(format!("invalid server URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendErrorPayload::bad_request(format!("invalid server URL: {base}")));
        }
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Response, BackendErrorPayload> {
        tracing::debug!(%method, %url, "backend request");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| BackendErrorPayload::unavailable(format!("The rules service is unreachable: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status.is_client_error() {
            if let Ok(body @ Value::Object(_)) = resp.json::<Value>().await {
                return Err(BackendErrorPayload(body));
            }
        }
        Err(BackendErrorPayload::unavailable(format!(
            "The rules service answered with status {}.",
            status.as_u16()
        )))
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, BackendErrorPayload> {
        resp.json::<T>()
            .await
            .map_err(|e| BackendErrorPayload::unavailable(format!("Malformed response from the rules service: {e}")))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, BackendErrorPayload> {
    serde_json::to_value(value).map_err(|e| BackendErrorPayload::bad_request(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn submit(&self, request: SubmitRequest) -> Result<Vec<StoredMetric>, BackendErrorPayload> {
        match request.operation {
            Operation::Create => {
                let body = to_json(&RuleSetRequest {
                    app_id: request.target.app_id,
                    environment: request.target.environment,
                    metrics: request.entries,
                })?;
                let resp = self.send(Method::POST, self.url(&["v1", "rules"]), Some(body)).await?;
                Self::decode(resp).await
            }
            Operation::Update { uuid } => {
                let Some(metric) = request.entries.first() else {
                    return Err(BackendErrorPayload::bad_request("An update needs exactly one metric."));
                };
                let body = to_json(metric)?;
                let resp = self
                    .send(Method::PUT, self.url(&["v1", "metrics", &uuid]), Some(body))
                    .await?;
                Ok(vec![Self::decode(resp).await?])
            }
            Operation::Delete { uuid } => {
                let resp = self
                    .send(Method::DELETE, self.url(&["v1", "metrics", &uuid]), None)
                    .await?;
                Ok(vec![Self::decode(resp).await?])
            }
        }
    }

    async fn list(&self, target: &RuleTarget) -> Result<Vec<StoredMetric>, BackendErrorPayload> {
        let mut url = self.url(&["v1", "apps", &target.app_id, "metrics"]);
        url.query_pairs_mut()
            .append_pair("environment", target.environment.as_str());
        let resp = self.send(Method::GET, url, None).await?;
        Self::decode(resp).await
    }
}

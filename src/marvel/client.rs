use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{CatalogApi, QueryParams, Signer, UpstreamError, UpstreamResponse};
use crate::config::Config;

/// 基于 reqwest 的 Marvel API 客户端
#[derive(Clone)]
pub struct MarvelClient {
    http: reqwest::Client,
    base_url: String,
    signer: Signer,
}

impl MarvelClient {
    pub fn new(
        base_url: impl Into<String>,
        signer: Signer,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.marvel_api_url.clone(),
            Signer::new(
                config.marvel_public_key.clone(),
                config.marvel_secret_key.clone(),
            ),
            config.upstream_timeout(),
        )
    }
}

#[async_trait]
impl CatalogApi for MarvelClient {
    async fn call(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}/{}", self.base_url, resource);
        tracing::debug!(%url, ?params, "Calling catalog API");

        let mut query = params.clone();
        self.signer.sign_now().merge_into(&mut query);

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(UpstreamError::MalformedBody)?;

        tracing::debug!(%url, status, "Catalog API responded");
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> MarvelClient {
        MarvelClient::new(base, Signer::new("pub", "sec"), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn passes_status_and_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(query_param("characters", "1009610"))
            .and(query_param("apikey", "pub"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"code": 409})))
            .expect(1)
            .mount(&server)
            .await;

        let mut params = QueryParams::new();
        params.insert("characters".into(), "1009610".into());
        let response = client(&server.uri()).call("events", &params).await.unwrap();

        assert_eq!(response.status, 409);
        assert_eq!(response.body, json!({"code": 409}));
    }

    #[tokio::test]
    async fn signs_each_request_with_a_valid_hash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        client(&server.uri())
            .call("comics", &QueryParams::new())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let pairs: QueryParams = requests[0].url.query_pairs().into_owned().collect();
        let expected = format!("{:x}", md5::compute(format!("{}secpub", pairs["ts"])));
        assert_eq!(pairs["hash"], expected);
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .call("comics", &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_network_error() {
        let err = client("http://127.0.0.1:1")
            .call("comics", &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Network(_)));
    }
}

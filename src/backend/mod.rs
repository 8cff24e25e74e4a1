use crate::core::models::{Company, CompanyId, NewCompany};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// REST client for the JobGo backend rooted at `backend_url`.
///
/// Response statuses are only inspected where the caller needs them (company
/// creation). Everywhere else the body is parsed as-is, so an error page with
/// a JSON body is handed back like any other payload.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, BackendError> {
        request.send().await.map_err(|source| BackendError::Request {
            url: url.to_string(),
            source,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, BackendError> {
        response.json::<T>().await.map_err(|source| BackendError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// `GET /jobs?new=true`
    pub async fn new_jobs(&self) -> Result<Value, BackendError> {
        let url = self.url("/jobs?new=true");
        let response = self.send(self.http.get(&url), &url).await?;
        Self::decode(response, &url).await
    }

    /// `POST /jobcart/scan`
    pub async fn scan(&self) -> Result<Value, BackendError> {
        let url = self.url("/jobcart/scan");
        let response = self.send(self.http.post(&url), &url).await?;
        Self::decode(response, &url).await
    }

    /// `POST /companies`. Returns `None` when the backend refuses the company,
    /// typically because it already exists.
    pub async fn create_company(
        &self,
        company: &NewCompany,
    ) -> Result<Option<Company>, BackendError> {
        let url = self.url("/companies");
        let response = self.send(self.http.post(&url).json(company), &url).await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), slug = %company.slug, "Company creation refused");
            return Ok(None);
        }

        Self::decode(response, &url).await.map(Some)
    }

    /// `GET /companies`
    pub async fn list_companies(&self) -> Result<Vec<Company>, BackendError> {
        let url = self.url("/companies");
        let response = self.send(self.http.get(&url), &url).await?;
        Self::decode(response, &url).await
    }

    /// `POST /jobcart/{id}`. The response is ignored.
    pub async fn add_to_cart(&self, id: &CompanyId) -> Result<(), BackendError> {
        let url = self.url(&format!("/jobcart/{id}"));
        let response = self.send(self.http.post(&url), &url).await?;
        tracing::debug!(status = %response.status(), company_id = %id, "Added company to cart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), format!("{}/api", server.uri()))
    }

    #[tokio::test]
    async fn test_new_jobs_queries_new_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .and(query_param("new", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server).new_jobs().await.unwrap();
        assert_eq!(body, json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn test_scan_parses_error_status_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/jobcart/scan"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "cart empty"})))
            .mount(&server)
            .await;

        let body = client(&server).scan().await.unwrap();
        assert_eq!(body["error"], "cart empty");
    }

    #[tokio::test]
    async fn test_scan_rejects_non_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/jobcart/scan"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).scan().await.unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_create_company_posts_triple() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/companies"))
            .and(body_json(json!({"name": "Acme", "platform": "lever", "slug": "acme"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "c-1", "name": "Acme", "platform": "lever", "slug": "acme"
            })))
            .mount(&server)
            .await;

        let company = client(&server)
            .create_company(&NewCompany {
                name: "Acme".to_string(),
                platform: "lever".to_string(),
                slug: "acme".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(company.id, CompanyId::Text("c-1".to_string()));
    }

    #[tokio::test]
    async fn test_create_company_conflict_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/companies"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "exists"})))
            .mount(&server)
            .await;

        let created = client(&server)
            .create_company(&NewCompany::default())
            .await
            .unwrap();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        let backend = BackendClient::new(reqwest::Client::new(), "http://127.0.0.1:1/api");
        let err = backend.new_jobs().await.unwrap_err();
        assert!(matches!(err, BackendError::Request { .. }));
    }
}

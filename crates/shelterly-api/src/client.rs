// Async HTTP client for the Shelterly REST backend.
//
// Base path: /api/
// Auth: optional X-User-Role header (a UX hint, never a credential)

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, FALLBACK_MESSAGE};
use crate::transport::TransportConfig;
use crate::types::{self, ErrorResponse, WireId};

/// Header carrying the locally stored role.
pub const ROLE_HEADER: &str = "X-User-Role";

/// Default backend location for local deployments.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the shelter, client, task, and admin endpoints.
///
/// One instance is bound to one role: the `X-User-Role` header is injected
/// as a default header at construction. Build a new client when the
/// session changes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url`, tagging every request with `role`
    /// when one is given.
    pub fn new(base_url: &str, role: Option<&str>, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(role) = role {
            let value = HeaderValue::from_str(role).map_err(|e| Error::InvalidHeader {
                name: ROLE_HEADER,
                reason: e.to_string(),
            })?;
            headers.insert(ROLE_HEADER, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages default headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins keep any prefix.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/shelters"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, path: &str, body: Option<&B>) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let mut req = self.http.put(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        self.handle_empty(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    #[allow(clippy::unused_self)]
    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => return Error::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => return Error::Forbidden,
            _ => {}
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Shelters ─────────────────────────────────────────────────────

    pub async fn list_shelters(&self) -> Result<Vec<types::ShelterResponse>, Error> {
        self.get("api/shelters").await
    }

    pub async fn get_shelter(&self, id: &WireId) -> Result<types::ShelterResponse, Error> {
        self.get(&format!("api/shelters/{id}")).await
    }

    /// Server-side search. Absent query keys mean "unfiltered on that dimension".
    pub async fn search_shelters(
        &self,
        query: &types::ShelterSearchQuery,
    ) -> Result<Vec<types::ShelterResponse>, Error> {
        self.get_with_params("api/shelters/search", &query.to_params())
            .await
    }

    /// Reserve one bed for `client_id`. The response body is not part of
    /// the contract and is ignored.
    pub async fn reserve_bed(&self, shelter_id: &WireId, client_id: &WireId) -> Result<(), Error> {
        let body = types::ReserveBedRequest {
            client_id: client_id.clone(),
        };
        self.post_no_response(&format!("api/shelters/{shelter_id}/reserve"), &body)
            .await
    }

    // ── Clients ──────────────────────────────────────────────────────

    pub async fn list_clients(&self) -> Result<Vec<types::ClientResponse>, Error> {
        self.get("api/clients").await
    }

    pub async fn get_client(&self, id: &WireId) -> Result<types::ClientResponse, Error> {
        self.get(&format!("api/clients/{id}")).await
    }

    pub async fn create_client(
        &self,
        req: &types::CreateClientRequest,
    ) -> Result<types::ClientResponse, Error> {
        self.post("api/clients", req).await
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn list_tasks(&self) -> Result<Vec<types::TaskResponse>, Error> {
        self.get("api/tasks").await
    }

    pub async fn get_task(&self, id: &WireId) -> Result<types::TaskResponse, Error> {
        self.get(&format!("api/tasks/{id}")).await
    }

    pub async fn assign_task(&self, id: &WireId, client_id: &str) -> Result<(), Error> {
        let body = types::AssignTaskRequest {
            client_id: client_id.to_owned(),
        };
        self.put_no_response(&format!("api/tasks/{id}/assign"), Some(&body))
            .await
    }

    pub async fn complete_task(&self, id: &WireId) -> Result<(), Error> {
        self.put_no_response::<()>(&format!("api/tasks/{id}/complete"), None)
            .await
    }

    // ── Admin: tasks ─────────────────────────────────────────────────

    pub async fn create_task(&self, req: &types::TaskRequest) -> Result<types::TaskResponse, Error> {
        self.post("api/admin/tasks", req).await
    }

    pub async fn update_task(
        &self,
        id: &WireId,
        req: &types::TaskRequest,
    ) -> Result<types::TaskResponse, Error> {
        self.put(&format!("api/admin/tasks/{id}"), req).await
    }

    pub async fn delete_task(&self, id: &WireId) -> Result<(), Error> {
        self.delete(&format!("api/admin/tasks/{id}")).await
    }

    // ── Admin: shelters ──────────────────────────────────────────────

    pub async fn create_shelter(
        &self,
        req: &types::ShelterRequest,
    ) -> Result<types::ShelterResponse, Error> {
        self.post("api/admin/shelters", req).await
    }

    pub async fn update_shelter(
        &self,
        id: &WireId,
        req: &types::ShelterRequest,
    ) -> Result<types::ShelterResponse, Error> {
        self.put(&format!("api/admin/shelters/{id}"), req).await
    }

    pub async fn delete_shelter(&self, id: &WireId) -> Result<(), Error> {
        self.delete(&format!("api/admin/shelters/{id}")).await
    }

    // ── Admin: analytics ─────────────────────────────────────────────

    pub async fn shelter_summary(&self) -> Result<types::ShelterSummaryResponse, Error> {
        self.get("api/admin/analytics/shelter-summary").await
    }

    pub async fn shelter_type_summary(
        &self,
    ) -> Result<Vec<types::ShelterTypeSummaryResponse>, Error> {
        self.get("api/admin/analytics/shelter-types").await
    }

    pub async fn task_summary(&self) -> Result<types::TaskSummaryResponse, Error> {
        self.get("api/admin/analytics/task-summary").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_prefix_and_gains_trailing_slash() {
        let client =
            BackendClient::from_reqwest("http://localhost:8081/backend", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8081/backend/");
        assert_eq!(
            client.url("api/shelters").unwrap().as_str(),
            "http://localhost:8081/backend/api/shelters"
        );
    }

    #[test]
    fn role_with_newline_is_rejected() {
        let err = BackendClient::new(
            DEFAULT_BASE_URL,
            Some("admin\nX-Evil: 1"),
            &TransportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { .. }));
    }
}

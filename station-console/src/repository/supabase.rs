//! Supabase (PostgREST) client for the stations table.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};

use crate::domain::{Station, StationFields, StationId, StationPatch};

use super::StationRepository;
use super::error::RepositoryError;

/// Default table holding the station rows.
const DEFAULT_TABLE: &str = "stations";

/// Ask PostgREST to echo the written rows back.
const PREFER_REPRESENTATION: &str = "return=representation";

/// Configuration for the Supabase client.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Anon (or service) key, sent as `apikey` and bearer token
    pub api_key: String,
    /// Table name under `/rest/v1`
    pub table: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    /// Create a new config for the given project URL and key.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: 30,
        }
    }

    /// Use a different table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Endpoint for the table, without query string.
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

/// Client for the stations table of a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    table_url: String,
}

impl SupabaseClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SupabaseConfig) -> Result<Self, RepositoryError> {
        let mut headers = HeaderMap::new();

        let invalid_key = || RepositoryError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        };
        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| invalid_key())?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| invalid_key())?;
        headers.insert(HeaderName::from_static("apikey"), api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            table_url: config.table_url(),
        })
    }

    fn id_filter(id: &StationId) -> (&'static str, String) {
        ("id", format!("eq.{}", id.as_str()))
    }
}

impl StationRepository for SupabaseClient {
    async fn list(&self) -> Result<Vec<Station>, RepositoryError> {
        tracing::debug!(url = %self.table_url, "fetching stations");

        let response = self
            .http
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let stations = parse_rows(check_status(response).await?).await?;
        tracing::debug!(count = stations.len(), "stations fetched");
        Ok(stations)
    }

    async fn insert(&self, fields: &StationFields) -> Result<Station, RepositoryError> {
        let response = self
            .http
            .post(&self.table_url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[fields])
            .send()
            .await?;

        let rows = parse_rows(check_status(response).await?).await?;
        rows.into_iter().next().ok_or_else(|| RepositoryError::Api {
            status: 0,
            message: "insert returned no row".to_string(),
        })
    }

    async fn update(
        &self,
        id: &StationId,
        patch: &StationPatch,
    ) -> Result<Station, RepositoryError> {
        let response = self
            .http
            .patch(&self.table_url)
            .query(&[Self::id_filter(id)])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(patch)
            .send()
            .await?;

        let rows = parse_rows(check_status(response).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn delete(&self, id: &StationId) -> Result<(), RepositoryError> {
        let response = self
            .http
            .delete(&self.table_url)
            .query(&[Self::id_filter(id)])
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Map non-success statuses onto [`RepositoryError`].
async fn check_status(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RepositoryError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RepositoryError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response)
}

async fn parse_rows(response: Response) -> Result<Vec<Station>, RepositoryError> {
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| RepositoryError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use axum::extract::Query;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::StationStatus;

    const KEY: &str = "test-anon-key";

    fn row(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "location": "5th Ave",
            "latitude": 40.0,
            "longitude": -74.0,
            "status": "Active",
            "power_output": 150,
            "connector_type": "CCS",
            "created_at": "2024-03-15T10:00:00Z"
        })
    }

    fn authorized(headers: &AxumHeaders) -> bool {
        let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
        let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
        apikey == Some(KEY) && bearer == Some("Bearer test-anon-key")
    }

    fn wants_representation(headers: &AxumHeaders) -> bool {
        headers.get("prefer").and_then(|v| v.to_str().ok()) == Some("return=representation")
    }

    /// Minimal stand-in for the PostgREST endpoint.
    fn fake_postgrest() -> Router {
        Router::new().route(
            "/rest/v1/stations",
            get(
                |headers: AxumHeaders, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return AxumStatus::UNAUTHORIZED.into_response();
                    }
                    if q.get("order").map(String::as_str) != Some("created_at.desc")
                        || q.get("select").map(String::as_str) != Some("*")
                    {
                        return (AxumStatus::BAD_REQUEST, "bad query").into_response();
                    }
                    Json(json!([row("b", "Newer"), row("a", "Older")])).into_response()
                },
            )
            .post(|headers: AxumHeaders, Json(body): Json<Vec<Value>>| async move {
                if !authorized(&headers) || !wants_representation(&headers) {
                    return AxumStatus::BAD_REQUEST.into_response();
                }
                let Some(fields) = body.first() else {
                    return AxumStatus::BAD_REQUEST.into_response();
                };
                if fields.get("id").is_some() {
                    return (AxumStatus::BAD_REQUEST, "id is server-assigned").into_response();
                }
                let mut created = fields.clone();
                created["id"] = json!("new-1");
                created["created_at"] = json!("2024-03-17T09:00:00Z");
                (AxumStatus::CREATED, Json(json!([created]))).into_response()
            })
            .patch(
                |Query(q): Query<HashMap<String, String>>, Json(patch): Json<Value>| async move {
                    match q.get("id").map(String::as_str) {
                        Some("eq.a") => {
                            let mut updated = row("a", "Older");
                            for (key, value) in patch.as_object().into_iter().flatten() {
                                updated[key] = value.clone();
                            }
                            Json(json!([updated])).into_response()
                        }
                        _ => Json(json!([])).into_response(),
                    }
                },
            )
            .delete(|Query(q): Query<HashMap<String, String>>| async move {
                match q.get("id").map(String::as_str) {
                    Some(filter) if filter.starts_with("eq.") => {
                        AxumStatus::NO_CONTENT.into_response()
                    }
                    _ => (AxumStatus::BAD_REQUEST, "missing filter").into_response(),
                }
            }),
        )
    }

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn client_for(app: Router, key: &str) -> SupabaseClient {
        let addr = serve(app).await;
        SupabaseClient::new(SupabaseConfig::new(format!("http://{addr}/"), key)).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = SupabaseConfig::new("https://example.supabase.co", "key");
        assert_eq!(config.table, "stations");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(
            config.table_url(),
            "https://example.supabase.co/rest/v1/stations"
        );
    }

    #[test]
    fn config_builders() {
        let config = SupabaseConfig::new("http://localhost:54321/", "key")
            .with_table("chargers")
            .with_timeout(5);
        assert_eq!(config.table_url(), "http://localhost:54321/rest/v1/chargers");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn rejects_unprintable_key() {
        let result = SupabaseClient::new(SupabaseConfig::new("http://localhost", "bad\nkey"));
        assert!(matches!(result, Err(RepositoryError::Api { status: 0, .. })));
    }

    #[tokio::test]
    async fn list_requests_newest_first() {
        let client = client_for(fake_postgrest(), KEY).await;

        let stations = client.list().await.unwrap();

        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[tokio::test]
    async fn list_with_wrong_key_is_unauthorized() {
        let client = client_for(fake_postgrest(), "wrong").await;

        let result = client.list().await;

        assert!(matches!(result, Err(RepositoryError::Unauthorized)));
    }

    #[tokio::test]
    async fn insert_returns_server_row() {
        let client = client_for(fake_postgrest(), KEY).await;
        let fields = StationFields {
            name: "Mall Charger".into(),
            location: "Oak Rd".into(),
            connector_type: "Type 2".into(),
            ..StationFields::default()
        };

        let created = client.insert(&fields).await.unwrap();

        assert_eq!(created.id.as_str(), "new-1");
        assert_eq!(created.name, "Mall Charger");
        assert_eq!(created.power_output, 50);
        assert!(created.created_at.is_some());
    }

    #[tokio::test]
    async fn update_sends_patch_keyed_by_id() {
        let client = client_for(fake_postgrest(), KEY).await;
        let patch = StationPatch {
            status: Some(StationStatus::Inactive),
            ..StationPatch::default()
        };

        let updated = client.update(&StationId::new("a"), &patch).await.unwrap();

        assert_eq!(updated.status, StationStatus::Inactive);
        assert_eq!(updated.name, "Older");
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let client = client_for(fake_postgrest(), KEY).await;

        let result = client
            .update(&StationId::new("zzz"), &StationPatch::default())
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound(id)) if id.as_str() == "zzz"));
    }

    #[tokio::test]
    async fn delete_succeeds_with_no_content() {
        let client = client_for(fake_postgrest(), KEY).await;
        client.delete(&StationId::new("a")).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_surfaces_status_and_body() {
        let app = Router::new().route(
            "/rest/v1/stations",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let client = client_for(app, KEY).await;

        let err = client.list().await.unwrap_err();

        assert_eq!(err.to_string(), "API error 503: maintenance");
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let app = Router::new().route("/rest/v1/stations", get(|| async { "not json" }));
        let client = client_for(app, KEY).await;

        let err = client.list().await.unwrap_err();

        match err {
            RepositoryError::Json { body, .. } => assert_eq!(body.as_deref(), Some("not json")),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }
}

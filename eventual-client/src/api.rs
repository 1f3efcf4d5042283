//! HTTP gateway for the eventual backend.
//!
//! One client for the whole REST surface: attaches the bearer token when the
//! session store holds one, normalizes the response envelope so callers
//! never branch on shape, and turns a 401 anywhere into a forced local
//! session teardown (with a redirect signal unless the current route is
//! public).

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use eventual_core::config::GlobalConfig;
use eventual_core::error::{EventualError, EventualResult};
use eventual_core::event::{Event, EventForm};
use eventual_core::logs::{LogQuery, LogStats, LogsPage};
use eventual_core::user::User;

use crate::session::SessionStore;

/// Upper bound per request.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Routes where a 401 does not force a redirect to login.
pub const PUBLIC_ROUTES: &[&str] = &["/", "/auth/callback"];

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    route: String,
}

impl ApiClient {
    pub fn new(config: &GlobalConfig, session: Arc<SessionStore>) -> EventualResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .map_err(|e| EventualError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            http,
            base_url: config.api_base_url(),
            session,
            route: "/".to_string(),
        })
    }

    /// Same client, operating under a different route context.
    pub fn with_route(mut self, route: &str) -> Self {
        self.route = route.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser entry point for the Google OAuth flow.
    pub fn google_login_url(&self, redirect_uri: &str) -> EventualResult<String> {
        let mut url = url::Url::parse(&format!("{}/auth/google", self.base_url))
            .map_err(|e| EventualError::Config(format!("Invalid API base URL: {e}")))?;
        url.query_pairs_mut().append_pair("redirect_uri", redirect_uri);
        Ok(url.to_string())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        path: &str,
    ) -> EventualResult<reqwest::Response> {
        let req = match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let response = req.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = read_error_detail(response).await;
        tracing::debug!(%status, path, "request failed");
        Err(self.error_for_status(status, path, detail))
    }

    fn error_for_status(
        &self,
        status: StatusCode,
        path: &str,
        detail: Option<String>,
    ) -> EventualError {
        match status {
            StatusCode::UNAUTHORIZED => {
                // An invalid token anywhere tears down the local session;
                // the redirect is suppressed on public routes.
                self.session.force_clear();
                let redirect = !PUBLIC_ROUTES.contains(&self.route.as_str());
                EventualError::SessionExpired { redirect }
            }
            StatusCode::FORBIDDEN => {
                EventualError::Permission(detail.unwrap_or_else(|| path.to_string()))
            }
            StatusCode::NOT_FOUND => {
                EventualError::NotFound(detail.unwrap_or_else(|| path.to_string()))
            }
            _ => EventualError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail.unwrap_or_else(|| "Unknown error".to_string())
            )),
        }
    }

    // --- events ---

    /// `GET /events`, optionally parameterized by a geocoded point.
    /// Proximity ranking is the backend's job.
    pub async fn list_events(&self, near: Option<(f64, f64)>) -> EventualResult<Vec<Event>> {
        let mut req = self.http.get(self.url("/events"));
        if let Some((lat, lon)) = near {
            req = req.query(&[("lat", lat), ("lon", lon)]);
        }

        let response = self.execute(req, "/events").await?;
        Ok(decode::<EventsResponse>(response).await?.events)
    }

    /// `GET /events/:id`
    pub async fn get_event(&self, id: &str) -> EventualResult<Event> {
        let path = format!("/events/{}", id);
        let response = self.execute(self.http.get(self.url(&path)), &path).await?;
        decode(response).await
    }

    /// `GET /events/user/my-events`
    pub async fn my_events(&self) -> EventualResult<Vec<Event>> {
        let response = self
            .execute(
                self.http.get(self.url("/events/user/my-events")),
                "/events/user/my-events",
            )
            .await?;
        Ok(decode::<EventsResponse>(response).await?.events)
    }

    /// `POST /events` (multipart form)
    pub async fn create_event(&self, form: &EventForm) -> EventualResult<Event> {
        let multipart = event_multipart(form).await?;
        let response = self
            .execute(self.http.post(self.url("/events")).multipart(multipart), "/events")
            .await?;
        decode(response).await
    }

    /// `PUT /events/:id` (multipart form)
    pub async fn update_event(&self, id: &str, form: &EventForm) -> EventualResult<Event> {
        let path = format!("/events/{}", id);
        let multipart = event_multipart(form).await?;
        let response = self
            .execute(self.http.put(self.url(&path)).multipart(multipart), &path)
            .await?;
        decode(response).await
    }

    /// `DELETE /events/:id`
    pub async fn delete_event(&self, id: &str) -> EventualResult<()> {
        let path = format!("/events/{}", id);
        self.execute(self.http.delete(self.url(&path)), &path).await?;
        Ok(())
    }

    /// `POST /events/geocode` — resolve an address to coordinates.
    pub async fn geocode(&self, address: &str) -> EventualResult<(f64, f64)> {
        let response = self
            .execute(
                self.http
                    .post(self.url("/events/geocode"))
                    .json(&serde_json::json!({ "address": address })),
                "/events/geocode",
            )
            .await?;

        let geo: GeocodeResponse = decode(response).await?;
        Ok((geo.lat, geo.lon))
    }

    // --- auth ---

    /// `GET /auth/verify` — is the current token still good?
    pub async fn verify(&self) -> EventualResult<()> {
        self.execute(self.http.get(self.url("/auth/verify")), "/auth/verify")
            .await?;
        Ok(())
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> EventualResult<()> {
        self.execute(self.http.post(self.url("/auth/logout")), "/auth/logout")
            .await?;
        Ok(())
    }

    /// `POST /auth/refresh` — new token for the current identity.
    pub async fn refresh_token(&self) -> EventualResult<String> {
        let response = self
            .execute(self.http.post(self.url("/auth/refresh")), "/auth/refresh")
            .await?;
        let body: TokenResponse = decode(response).await?;
        Ok(body.token)
    }

    /// `GET /auth/profile`
    pub async fn get_profile(&self) -> EventualResult<User> {
        let response = self
            .execute(self.http.get(self.url("/auth/profile")), "/auth/profile")
            .await?;
        let body: ProfileResponse = decode(response).await?;
        Ok(body.user)
    }

    // --- logs ---

    /// `GET /logs`
    pub async fn get_logs(&self, query: &LogQuery) -> EventualResult<LogsPage> {
        let req = self.http.get(self.url("/logs")).query(&query.to_params());
        let response = self.execute(req, "/logs").await?;
        decode(response).await
    }

    /// `GET /logs/stats`
    pub async fn get_log_stats(&self) -> EventualResult<LogStats> {
        let response = self
            .execute(self.http.get(self.url("/logs/stats")), "/logs/stats")
            .await?;
        decode(response).await
    }

    /// `GET /logs/export` — CSV bytes as served by the backend.
    pub async fn export_logs(&self, query: &LogQuery) -> EventualResult<Vec<u8>> {
        let req = self.http.get(self.url("/logs/export")).query(&query.to_params());
        let response = self.execute(req, "/logs/export").await?;
        Ok(response.bytes().await.map_err(transport_error)?.to_vec())
    }
}

/// Backend responses come either bare or wrapped in `{data: ...}`;
/// normalize here so callers never branch on shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> EventualResult<T> {
    response
        .json::<Envelope<T>>()
        .await
        .map(Envelope::into_inner)
        .map_err(|e| EventualError::Serialization(format!("Unexpected response shape: {e}")))
}

fn transport_error(err: reqwest::Error) -> EventualError {
    if err.is_timeout() {
        EventualError::Timeout(REQUEST_TIMEOUT_SECS)
    } else {
        EventualError::Network(err.to_string())
    }
}

async fn read_error_detail(response: reqwest::Response) -> Option<String> {
    response.json::<ErrorBody>().await.ok()?.message()
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        if let Some(error) = self.error {
            return Some(error);
        }
        match self.details {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ProfileResponse {
    user: User,
}

async fn event_multipart(form: &EventForm) -> EventualResult<multipart::Form> {
    let mut parts = multipart::Form::new()
        .text("nombre", form.nombre.clone())
        .text("lugar", form.lugar.clone())
        .text("categoria", form.categoria.to_string());

    if let Some(timestamp) = form.timestamp {
        parts = parts.text("timestamp", timestamp.to_rfc3339());
    }
    if let Some(descripcion) = &form.descripcion {
        parts = parts.text("descripcion", descripcion.clone());
    }
    if let Some(precio) = form.precio {
        parts = parts.text("precio", precio.to_string());
    }
    if let Some(capacidad) = form.capacidad {
        parts = parts.text("capacidad", capacidad.to_string());
    }

    if let Some(imagen) = &form.imagen {
        let bytes = tokio::fs::read(&imagen.path).await?;
        let file_name = imagen
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "imagen".to_string());
        let mut part = multipart::Part::bytes(bytes).file_name(file_name);
        if let Some(mime) = imagen.mime_type() {
            part = part
                .mime_str(&mime)
                .map_err(|e| EventualError::Validation(e.to_string()))?;
        }
        parts = parts.part("imagen", part);
    }

    Ok(parts)
}

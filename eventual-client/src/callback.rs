//! OAuth callback flow.
//!
//! The backend's Google entry point redirects back to a loopback address
//! with the session token and the URL-encoded JSON user as query
//! parameters. We listen for that single redirect, bounded by a fixed wait,
//! and hand the pair to the session store.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use url::Url;

use eventual_core::error::{EventualError, EventualResult};
use eventual_core::user::User;

use crate::session::SessionStore;

const CALLBACK_PORT: u16 = 8123;

/// Bound on the wait for the browser redirect.
pub const CALLBACK_TIMEOUT_SECS: u64 = 10;

/// Error shown when the redirect is missing `token` or `user`.
pub const MISSING_DATA_ERROR: &str = "Datos de autenticación faltantes";

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", CALLBACK_PORT)
}

fn redirect_address() -> String {
    format!("127.0.0.1:{}", CALLBACK_PORT)
}

/// Token + decoded user payload carried by the callback redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackData {
    pub token: String,
    /// URL-decoded JSON; parsed (and rejected if malformed) by
    /// `SessionStore::login`.
    pub user_json: String,
}

/// Extract the callback data from the redirect URL. The absence of either
/// parameter is a hard error.
pub fn parse_callback(url: &Url) -> EventualResult<CallbackData> {
    let token = query_param(url, "token");
    let user_json = query_param(url, "user");

    match (token, user_json) {
        (Some(token), Some(user_json)) if !token.is_empty() && !user_json.is_empty() => {
            Ok(CallbackData { token, user_json })
        }
        _ => Err(EventualError::Auth(MISSING_DATA_ERROR.to_string())),
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    // query_pairs percent-decodes the value
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Complete a login: wait for the browser redirect (bounded), validate the
/// callback data, and log the pair into the store. The session store is
/// unchanged on any failure.
pub async fn complete_login(store: &SessionStore) -> EventualResult<User> {
    let data = tokio::time::timeout(
        Duration::from_secs(CALLBACK_TIMEOUT_SECS),
        wait_for_callback(),
    )
    .await
    .map_err(|_| EventualError::Timeout(CALLBACK_TIMEOUT_SECS))??;

    store.login(&data.token, &data.user_json)
}

/// Listen for the single OAuth redirect and answer the browser.
async fn wait_for_callback() -> EventualResult<CallbackData> {
    let listener = TcpListener::bind(redirect_address()).await.map_err(|e| {
        EventualError::Auth(format!("No se pudo abrir el puerto de callback: {}", e))
    })?;

    let (stream, _) = listener
        .accept()
        .await
        .map_err(|e| EventualError::Network(e.to_string()))?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .map_err(|e| EventualError::Network(e.to_string()))?;

    let result = parse_request_line(&request_line);

    let response = match &result {
        Ok(_) => success_page(),
        Err(err) => error_page(&err.to_string()),
    };

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .map_err(|e| EventualError::Network(e.to_string()))?;
    stream.flush().await.map_err(|e| EventualError::Network(e.to_string()))?;

    result
}

/// Parse the HTTP request line of the redirect into callback data.
fn parse_request_line(request_line: &str) -> EventualResult<CallbackData> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| EventualError::Auth("Petición de callback inválida".to_string()))?;

    let url = Url::parse(&format!("http://localhost{}", url_part))
        .map_err(|e| EventualError::Auth(format!("URL de callback inválida: {}", e)))?;

    parse_callback(&url)
}

fn success_page() -> String {
    http_page(
        "¡Autenticación completada!",
        "Puedes cerrar esta ventana y volver al terminal.",
    )
}

fn error_page(detail: &str) -> String {
    http_page("Error de autenticación", detail)
}

fn http_page(title: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body><h1>{}</h1><p>{}</p></body></html>",
        title, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStorage;

    fn callback_url(query: &str) -> Url {
        Url::parse(&format!("http://localhost:8123/callback?{}", query)).unwrap()
    }

    #[test]
    fn test_parse_callback_with_both_params() {
        let user = urlencoded(r#"{"email":"ana@example.com","name":"Ana"}"#);
        let url = callback_url(&format!("token=tok-1&user={}", user));

        let data = parse_callback(&url).unwrap();
        assert_eq!(data.token, "tok-1");
        assert_eq!(data.user_json, r#"{"email":"ana@example.com","name":"Ana"}"#);
    }

    #[test]
    fn test_missing_user_is_a_hard_error() {
        let url = callback_url("token=tok-1");

        let err = parse_callback(&url).unwrap_err();
        assert!(matches!(err, EventualError::Auth(msg) if msg == MISSING_DATA_ERROR));
    }

    #[test]
    fn test_missing_token_is_a_hard_error() {
        let url = callback_url("user=%7B%22email%22%3A%22a%40b.com%22%7D");

        let err = parse_callback(&url).unwrap_err();
        assert!(matches!(err, EventualError::Auth(msg) if msg == MISSING_DATA_ERROR));
    }

    #[test]
    fn test_missing_user_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(SessionStorage::at(dir.path()));
        let before = store.snapshot();

        let url = callback_url("token=tok-1");
        assert!(parse_callback(&url).is_err());

        assert_eq!(store.snapshot(), before);
        assert!(SessionStorage::at(dir.path()).load().is_none());
    }

    #[test]
    fn test_malformed_user_json_fails_at_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(SessionStorage::at(dir.path()));

        let user = urlencoded("not-json-at-all");
        let url = callback_url(&format!("token=tok-1&user={}", user));
        let data = parse_callback(&url).unwrap();

        let err = store.login(&data.token, &data.user_json).unwrap_err();
        assert!(matches!(err, EventualError::Auth(_)));
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn test_parse_request_line() {
        let user = urlencoded(r#"{"email":"ana@example.com"}"#);
        let line = format!("GET /callback?token=tok-1&user={} HTTP/1.1\r\n", user);

        let data = parse_request_line(&line).unwrap();
        assert_eq!(data.token, "tok-1");
    }

    fn urlencoded(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}

pub mod auth;
pub mod create;
pub mod delete;
pub mod edit;
pub mod events;
pub mod logs;
pub mod mine;
pub mod show;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use eventual_client::{ApiClient, SessionStore, SessionStorage};
use eventual_core::config::GlobalConfig;
use eventual_core::event::{Categoria, EventForm, ImageFile};
use eventual_core::user::User;

/// Shared state every command starts from: the session store (hydrated and
/// verified against the backend) and the gateway bound to the command's
/// route.
pub struct Context {
    pub store: Arc<SessionStore>,
    pub api: ApiClient,
}

impl Context {
    pub async fn build(route: &str) -> Result<Self> {
        let config = GlobalConfig::load()?;
        let store = Arc::new(SessionStore::new(SessionStorage::open_default()?));
        let api = ApiClient::new(&config, store.clone())?.with_route(route);

        store.initialize(&api).await;

        Ok(Context { store, api })
    }

    /// The authenticated user, or a login hint.
    pub fn require_user(&self) -> Result<User> {
        let session = self.store.snapshot();
        match session.user {
            Some(user) if session.is_authenticated() => Ok(user),
            _ => anyhow::bail!(
                "Debes iniciar sesión primero:\n  \
                eventual auth login"
            ),
        }
    }
}

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Parse a user-supplied event date: RFC 3339, or "YYYY-MM-DDTHH:MM" in
/// local time.
pub fn parse_fecha(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .with_context(|| format!("Fecha inválida '{}'. Usa YYYY-MM-DDTHH:MM", s))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("Fecha ambigua '{}'", s))
}

#[allow(clippy::too_many_arguments)]
pub fn build_form(
    nombre: String,
    fecha: &str,
    lugar: String,
    descripcion: Option<String>,
    categoria: Categoria,
    precio: Option<f64>,
    capacidad: Option<u32>,
    imagen: Option<PathBuf>,
) -> Result<EventForm> {
    let imagen = imagen
        .map(|path| {
            ImageFile::from_path(&path)
                .with_context(|| format!("No se pudo leer la imagen {}", path.display()))
        })
        .transpose()?;

    Ok(EventForm {
        nombre,
        timestamp: Some(parse_fecha(fecha)?),
        lugar,
        descripcion,
        categoria,
        precio,
        capacidad,
        imagen,
    })
}

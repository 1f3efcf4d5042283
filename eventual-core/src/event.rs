//! Domain types for community events.
//!
//! Events are created and edited only through the backend; the client holds
//! transient copies of them. Wire field names follow the backend (Spanish
//! domain fields, camelCase timestamps).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A community event listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Backend id. Some endpoints return `_id` instead; both map here.
    #[serde(alias = "_id")]
    pub id: String,
    pub nombre: String,
    pub timestamp: DateTime<Utc>,
    pub lugar: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: Categoria,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub capacidad: Option<u32>,
    #[serde(default)]
    pub imagen: Option<String>,
    /// Owning user, identified by email.
    pub organizador: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Whether `email` may edit or delete this event.
    ///
    /// Client-side convenience check only; the backend independently
    /// re-enforces ownership on every mutation.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.organizador == email
    }
}

/// Event category (closed backend vocabulary, lowercase on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Categoria {
    #[serde(rename = "cultural")]
    Cultural,
    #[serde(rename = "deportivo")]
    Deportivo,
    #[serde(rename = "musical")]
    Musical,
    #[serde(rename = "educativo")]
    Educativo,
    #[serde(rename = "gastronómico")]
    Gastronomico,
    #[serde(rename = "tecnológico")]
    Tecnologico,
    #[serde(rename = "otro")]
    Otro,
}

impl Categoria {
    pub const ALL: &'static [Categoria] = &[
        Categoria::Cultural,
        Categoria::Deportivo,
        Categoria::Musical,
        Categoria::Educativo,
        Categoria::Gastronomico,
        Categoria::Tecnologico,
        Categoria::Otro,
    ];

    /// Wire name (what the backend stores and filters on).
    pub fn as_str(&self) -> &'static str {
        match self {
            Categoria::Cultural => "cultural",
            Categoria::Deportivo => "deportivo",
            Categoria::Musical => "musical",
            Categoria::Educativo => "educativo",
            Categoria::Gastronomico => "gastronómico",
            Categoria::Tecnologico => "tecnológico",
            Categoria::Otro => "otro",
        }
    }
}

impl fmt::Display for Categoria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Categoria {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the unaccented spellings too, for convenience on the CLI
        match s.to_lowercase().as_str() {
            "cultural" => Ok(Categoria::Cultural),
            "deportivo" => Ok(Categoria::Deportivo),
            "musical" => Ok(Categoria::Musical),
            "educativo" => Ok(Categoria::Educativo),
            "gastronómico" | "gastronomico" => Ok(Categoria::Gastronomico),
            "tecnológico" | "tecnologico" => Ok(Categoria::Tecnologico),
            "otro" => Ok(Categoria::Otro),
            other => Err(format!(
                "Categoría desconocida '{}'. Válidas: cultural, deportivo, musical, educativo, gastronómico, tecnológico, otro",
                other
            )),
        }
    }
}

impl Default for Categoria {
    fn default() -> Self {
        Categoria::Otro
    }
}

/// An image attached to an event form, with the metadata validation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ImageFile {
    /// Build from a local path, reading the file size from disk.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)?.len();
        Ok(ImageFile { path, size })
    }

    /// Guessed MIME type from the file extension.
    pub fn mime_type(&self) -> Option<String> {
        mime_guess::from_path(&self.path)
            .first()
            .map(|m| m.essence_str().to_string())
    }
}

/// Input for creating or editing an event. Submitted as multipart form data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub nombre: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub lugar: String,
    pub descripcion: Option<String>,
    pub categoria: Categoria,
    pub precio: Option<f64>,
    pub capacidad: Option<u32>,
    pub imagen: Option<ImageFile>,
}

impl EventForm {
    /// Prefill a form from an existing event (edit flow).
    pub fn from_event(event: &Event) -> Self {
        EventForm {
            nombre: event.nombre.clone(),
            timestamp: Some(event.timestamp),
            lugar: event.lugar.clone(),
            descripcion: event.descripcion.clone(),
            categoria: event.categoria,
            precio: Some(event.precio),
            capacidad: event.capacidad,
            imagen: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categoria_roundtrip_accented_names() {
        let json = serde_json::to_string(&Categoria::Gastronomico).unwrap();
        assert_eq!(json, "\"gastronómico\"");
        let back: Categoria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Categoria::Gastronomico);
    }

    #[test]
    fn test_categoria_from_str_accepts_unaccented() {
        assert_eq!(
            "tecnologico".parse::<Categoria>().unwrap(),
            Categoria::Tecnologico
        );
        assert!("teatro".parse::<Categoria>().is_err());
    }

    #[test]
    fn test_event_deserializes_backend_payload() {
        let event: Event = serde_json::from_str(
            r#"{
                "_id": "abc123",
                "nombre": "Concierto de Jazz",
                "timestamp": "2026-09-01T19:00:00Z",
                "lugar": "Parque Central",
                "lat": 40.4168,
                "lon": -3.7038,
                "categoria": "musical",
                "precio": 12.5,
                "capacidad": 200,
                "organizador": "ana@example.com",
                "createdAt": "2026-08-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(event.id, "abc123");
        assert_eq!(event.categoria, Categoria::Musical);
        assert!(event.created_at.is_some());
        assert!(event.updated_at.is_none());
        assert!(event.descripcion.is_none());
    }

    #[test]
    fn test_ownership_requires_exact_email_match() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": "e1",
                "nombre": "x",
                "timestamp": "2026-09-01T19:00:00Z",
                "lugar": "y",
                "lat": 0.0,
                "lon": 0.0,
                "categoria": "otro",
                "organizador": "ana@example.com"
            }"#,
        )
        .unwrap();

        assert!(event.is_owned_by("ana@example.com"));
        assert!(!event.is_owned_by("Ana@example.com"));
        assert!(!event.is_owned_by("otro@example.com"));
    }
}

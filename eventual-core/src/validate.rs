//! Event form validation.
//!
//! One pure pass over the form, returning field-scoped messages. An empty
//! map means the form may be submitted; any entry blocks submission without
//! contacting the backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::event::EventForm;

/// Maximum accepted image size (5 MB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Validate an event form against the submission rules.
///
/// `now` is the reference instant for the future-date requirement.
pub fn validate(form: &EventForm, now: DateTime<Utc>) -> BTreeMap<&'static str, String> {
    let mut errors = BTreeMap::new();

    if form.nombre.trim().is_empty() {
        errors.insert("nombre", "El nombre del evento es obligatorio".to_string());
    }

    match form.timestamp {
        None => {
            errors.insert(
                "timestamp",
                "La fecha y hora del evento es obligatoria".to_string(),
            );
        }
        Some(timestamp) if timestamp <= now => {
            errors.insert("timestamp", "La fecha del evento debe ser futura".to_string());
        }
        Some(_) => {}
    }

    if form.lugar.trim().is_empty() {
        errors.insert("lugar", "La dirección del evento es obligatoria".to_string());
    }

    if let Some(precio) = form.precio {
        if precio < 0.0 {
            errors.insert("precio", "El precio no puede ser negativo".to_string());
        }
    }

    if let Some(capacidad) = form.capacidad {
        if capacidad < 1 {
            errors.insert("capacidad", "La capacidad debe ser al menos 1".to_string());
        }
    }

    if let Some(imagen) = &form.imagen {
        if imagen.size > MAX_IMAGE_BYTES {
            errors.insert("imagen", "La imagen no puede superar los 5MB".to_string());
        } else {
            let is_image = imagen
                .mime_type()
                .is_some_and(|mime| mime.starts_with("image/"));
            if !is_image {
                errors.insert("imagen", "Solo se permiten archivos de imagen".to_string());
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Categoria, ImageFile};
    use chrono::{Duration, TimeZone};
    use std::path::PathBuf;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn valid_form() -> EventForm {
        EventForm {
            nombre: "Concierto de Jazz".to_string(),
            timestamp: Some(now() + Duration::days(7)),
            lugar: "Parque Central, Madrid".to_string(),
            descripcion: Some("Jazz al aire libre".to_string()),
            categoria: Categoria::Musical,
            precio: Some(12.5),
            capacidad: Some(200),
            imagen: None,
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&valid_form(), now()).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let form = EventForm {
            nombre: "   ".to_string(),
            timestamp: None,
            lugar: String::new(),
            ..valid_form()
        };

        let errors = validate(&form, now());
        assert_eq!(
            errors.get("nombre").unwrap(),
            "El nombre del evento es obligatorio"
        );
        assert_eq!(
            errors.get("timestamp").unwrap(),
            "La fecha y hora del evento es obligatoria"
        );
        assert_eq!(
            errors.get("lugar").unwrap(),
            "La dirección del evento es obligatoria"
        );
    }

    #[test]
    fn test_past_date_rejected() {
        let form = EventForm {
            timestamp: Some(now() - Duration::hours(1)),
            ..valid_form()
        };

        let errors = validate(&form, now());
        assert_eq!(
            errors.get("timestamp").unwrap(),
            "La fecha del evento debe ser futura"
        );
    }

    #[test]
    fn test_date_equal_to_now_rejected() {
        let form = EventForm {
            timestamp: Some(now()),
            ..valid_form()
        };

        assert!(validate(&form, now()).contains_key("timestamp"));
    }

    #[test]
    fn test_negative_price_and_zero_capacity() {
        let form = EventForm {
            precio: Some(-1.0),
            capacidad: Some(0),
            ..valid_form()
        };

        let errors = validate(&form, now());
        assert_eq!(errors.get("precio").unwrap(), "El precio no puede ser negativo");
        assert_eq!(
            errors.get("capacidad").unwrap(),
            "La capacidad debe ser al menos 1"
        );
    }

    #[test]
    fn test_free_event_and_missing_optionals_are_fine() {
        let form = EventForm {
            precio: Some(0.0),
            capacidad: None,
            descripcion: None,
            ..valid_form()
        };

        assert!(validate(&form, now()).is_empty());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let form = EventForm {
            imagen: Some(ImageFile {
                path: PathBuf::from("cartel.png"),
                size: MAX_IMAGE_BYTES + 1,
            }),
            ..valid_form()
        };

        let errors = validate(&form, now());
        assert_eq!(
            errors.get("imagen").unwrap(),
            "La imagen no puede superar los 5MB"
        );
    }

    #[test]
    fn test_non_image_file_rejected() {
        let form = EventForm {
            imagen: Some(ImageFile {
                path: PathBuf::from("cartel.pdf"),
                size: 1024,
            }),
            ..valid_form()
        };

        let errors = validate(&form, now());
        assert_eq!(
            errors.get("imagen").unwrap(),
            "Solo se permiten archivos de imagen"
        );
    }

    #[test]
    fn test_image_at_limit_accepted() {
        let form = EventForm {
            imagen: Some(ImageFile {
                path: PathBuf::from("cartel.jpg"),
                size: MAX_IMAGE_BYTES,
            }),
            ..valid_form()
        };

        assert!(validate(&form, now()).is_empty());
    }
}

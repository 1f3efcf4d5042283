//! Client-side event filtering.
//!
//! Filters are a pure pass over the raw event set: they derive a filtered
//! view and never mutate their input. All active filters must pass for an
//! event to remain (conjunction), applied in a fixed order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Categoria, Event};

/// Filter criteria for the event list. All fields optional; `None` means the
/// corresponding predicate is inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub categoria: Option<Categoria>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub precio_max: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.categoria.is_none()
            && self.fecha_inicio.is_none()
            && self.fecha_fin.is_none()
            && self.precio_max.is_none()
    }

    /// Derive the filtered view of `events`, preserving relative order.
    ///
    /// Predicate order: categoria equality, timestamp >= start of
    /// `fecha_inicio`, timestamp <= end of `fecha_fin` (inclusive at
    /// 23:59:59.999), precio <= `precio_max`.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        let mut filtered: Vec<Event> = events.to_vec();

        if let Some(categoria) = self.categoria {
            filtered.retain(|e| e.categoria == categoria);
        }

        if let Some(desde) = self.fecha_inicio {
            let lower = start_of_day(desde);
            filtered.retain(|e| e.timestamp >= lower);
        }

        if let Some(hasta) = self.fecha_fin {
            let upper = end_of_day(hasta);
            filtered.retain(|e| e.timestamp <= upper);
        }

        if let Some(max) = self.precio_max {
            filtered.retain(|e| e.precio <= max);
        }

        filtered
    }
}

/// 00:00:00.000 of `date` in UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

/// 23:59:59.999 of `date` in UTC.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_event(id: &str, categoria: Categoria, timestamp: DateTime<Utc>, precio: f64) -> Event {
        Event {
            id: id.to_string(),
            nombre: format!("Evento {}", id),
            timestamp,
            lugar: "Madrid".to_string(),
            lat: 40.4168,
            lon: -3.7038,
            descripcion: None,
            categoria,
            precio,
            capacidad: Some(100),
            imagen: None,
            organizador: "ana@example.com".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_events() -> Vec<Event> {
        let base = Utc.with_ymd_and_hms(2026, 9, 10, 18, 0, 0).unwrap();
        vec![
            make_event("a", Categoria::Cultural, base, 0.0),
            make_event("b", Categoria::Musical, base + Duration::days(1), 15.0),
            make_event("c", Categoria::Cultural, base + Duration::days(2), 30.0),
        ]
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let events = sample_events();
        let filtered = FilterCriteria::default().apply(&events);
        assert_eq!(filtered, events);
    }

    #[test]
    fn test_categoria_filter_keeps_order() {
        let events = sample_events();
        let criteria = FilterCriteria {
            categoria: Some(Categoria::Cultural),
            ..Default::default()
        };

        let filtered = criteria.apply(&events);
        let ids: Vec<&str> = filtered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_conjunction_equals_intersection_of_predicates() {
        let events = sample_events();
        let criteria = FilterCriteria {
            categoria: Some(Categoria::Cultural),
            fecha_inicio: None,
            fecha_fin: None,
            precio_max: Some(10.0),
        };

        let combined = criteria.apply(&events);

        let only_categoria = FilterCriteria {
            categoria: Some(Categoria::Cultural),
            ..Default::default()
        }
        .apply(&events);
        let only_precio = FilterCriteria {
            precio_max: Some(10.0),
            ..Default::default()
        }
        .apply(&events);

        let intersection: Vec<&Event> = events
            .iter()
            .filter(|e| only_categoria.contains(e) && only_precio.contains(e))
            .collect();

        assert_eq!(combined.len(), intersection.len());
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, "a");
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let events = sample_events();
        let criteria = FilterCriteria {
            categoria: Some(Categoria::Cultural),
            fecha_fin: Some(NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()),
            precio_max: Some(50.0),
            ..Default::default()
        };

        let once = criteria.apply(&events);
        let twice = criteria.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fecha_fin_inclusive_at_end_of_day() {
        let fin = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
        let at_boundary = make_event("edge", Categoria::Otro, end_of_day(fin), 0.0);
        let past_boundary = make_event(
            "late",
            Categoria::Otro,
            end_of_day(fin) + Duration::milliseconds(1),
            0.0,
        );

        let criteria = FilterCriteria {
            fecha_fin: Some(fin),
            ..Default::default()
        };

        let filtered = criteria.apply(&[at_boundary.clone(), past_boundary]);
        assert_eq!(filtered, vec![at_boundary]);
    }

    #[test]
    fn test_fecha_inicio_inclusive_at_start_of_day() {
        let inicio = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
        let at_boundary = make_event("edge", Categoria::Otro, start_of_day(inicio), 0.0);
        let before = make_event(
            "early",
            Categoria::Otro,
            start_of_day(inicio) - Duration::milliseconds(1),
            0.0,
        );

        let criteria = FilterCriteria {
            fecha_inicio: Some(inicio),
            ..Default::default()
        };

        let filtered = criteria.apply(&[before, at_boundary.clone()]);
        assert_eq!(filtered, vec![at_boundary]);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let events = sample_events();
        let criteria = FilterCriteria {
            precio_max: Some(1.0),
            ..Default::default()
        };

        let _ = criteria.apply(&events);
        assert_eq!(events.len(), 3);
    }
}

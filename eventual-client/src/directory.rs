//! Event directory: the search/filter pipeline feeding list and map views.
//!
//! The directory owns a raw event set (from the global listing or a geocoded
//! proximity search), the active filter criteria, and the derived filtered
//! view. Filtering never mutates the raw set and is re-run synchronously
//! whenever the raw set or the criteria change.

use eventual_core::error::EventualResult;
use eventual_core::event::Event;
use eventual_core::filter::FilterCriteria;

use crate::api::ApiClient;

/// Informational outcome of a search, distinct from a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A proximity search resolved fine but matched nothing.
    NoNearbyEvents,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoNearbyEvents => "No se encontraron eventos cercanos a esa ubicación.",
        }
    }
}

#[derive(Default)]
pub struct EventDirectory {
    raw: Vec<Event>,
    criteria: FilterCriteria,
    filtered: Vec<Event>,
    map_center: Option<(f64, f64)>,
    notice: Option<Notice>,
    generation: u64,
}

impl EventDirectory {
    pub fn new() -> Self {
        EventDirectory::default()
    }

    /// The derived, filtered view.
    pub fn events(&self) -> &[Event] {
        &self.filtered
    }

    /// Size of the raw (unfiltered) set.
    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub fn map_center(&self) -> Option<(f64, f64)> {
        self.map_center
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the filter criteria and re-derive the view synchronously.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self.criteria.apply(&self.raw);
    }

    /// Stamp a new fetch. Responses carrying an older stamp are stale.
    fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Install a fetch result. Returns false (discarding the result) when a
    /// newer fetch has been issued since `generation` was stamped.
    fn ingest(
        &mut self,
        generation: u64,
        events: Vec<Event>,
        center: Option<(f64, f64)>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale fetch discarded");
            return false;
        }

        self.notice = match (&center, events.is_empty()) {
            (Some(_), true) => Some(Notice::NoNearbyEvents),
            _ => None,
        };
        self.raw = events;
        self.map_center = center;
        self.refilter();
        true
    }

    /// Unfiltered global listing; clears any map center.
    pub async fn load_all(&mut self, api: &ApiClient) -> EventualResult<()> {
        let generation = self.begin_fetch();
        let events = api.list_events(None).await?;
        self.ingest(generation, events, None);
        Ok(())
    }

    /// Address search. An empty address re-triggers the global load. A
    /// geocoding failure surfaces the error and leaves the event list and
    /// map center untouched.
    pub async fn search(&mut self, api: &ApiClient, address: &str) -> EventualResult<()> {
        if address.trim().is_empty() {
            return self.load_all(api).await;
        }

        let (lat, lon) = api.geocode(address).await?;

        let generation = self.begin_fetch();
        let events = api.list_events(Some((lat, lon))).await?;
        self.ingest(generation, events, Some((lat, lon)));
        Ok(())
    }
}

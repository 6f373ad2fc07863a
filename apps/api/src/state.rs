use crate::itinerary::ItineraryService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Validation, storage and report rendering for itineraries.
    pub itineraries: ItineraryService,
}

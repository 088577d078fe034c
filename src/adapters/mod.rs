// Adapters layer: concrete implementations for external systems (http, storage).

pub mod foursquare;

//! Address geocoding against the Google Geocoding API.

pub mod client;

pub use client::{GeocodeError, GoogleGeocoder};

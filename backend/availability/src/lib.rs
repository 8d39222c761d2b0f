//! Seeded flight generation, availability searches and fixed-column listings.

pub mod cities;
pub mod generator;
pub mod render;
pub mod rng;
pub mod service;

pub use generator::FlightGenerator;
pub use rng::SeededRandom;
pub use service::{AvailabilityOptions, AvailabilityService};

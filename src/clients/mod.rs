//! Clientes para los dispositivos de campo

pub mod api_client;
pub mod location_pinger;

pub use api_client::{LocationPing, TrackerApiClient};
pub use location_pinger::{LocationPinger, LocationSink, Position, PositionSource, SessionSnapshot};

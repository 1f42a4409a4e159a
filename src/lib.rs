pub mod app;
pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod events;
pub mod geo;
pub mod location;
pub mod logging;
pub mod models;
pub mod ranker;
pub mod search;
pub mod ui;

pub use geo::{haversine_km, Coordinate};
pub use location::{LocationResolver, ProviderKind, ProviderSpec};
pub use models::{ResolvedLocation, Salon};
pub use ranker::{find_nearest, Located, RankedResult};

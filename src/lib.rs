//! Charlotte Guide — weather, events and attractions for Charlotte, NC,
//! built around great-circle radius search.

pub mod config;
pub mod geo;
pub mod places;
pub mod server;
pub mod weather;

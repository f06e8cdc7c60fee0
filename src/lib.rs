//! Data layer for the blaseball float simulation.
//!
//! Team, stadium and standings data come from several JSON APIs. Each
//! dataset sits behind a lazily loaded cache ([`cache::LazyData`],
//! [`cache::MemoizedData`]) that fetches once, shares in-flight requests
//! between callers, and reloads on demand. [`store::DataStore`] wires the
//! caches into their dependency graph and [`simulation::load_simulation`]
//! feeds the selected team to the physics view.

pub mod app;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod simulation;
pub mod status;
pub mod store;
pub mod utils;

#[cfg(test)]
mod testing;

pub use app::AppContext;
pub use cache::{LazyData, LoadResult, MemoizedData};
pub use error::LoadError;
pub use status::StatusLog;

//! Legis Tracker - legislative bill tracking
//!
//! Follows bills through both chambers of Congress: their stages,
//! proceedings, weekly temperature, agenda and amendments. On top of the
//! stored records it derives what a bill page shows:
//! - Temperature trend of each stage
//! - Progress bar over the eight canonical phases
//! - Condensed proceedings and committees visited
//! - Current status and the chamber's own page for each stage

pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod links;
pub mod models;
pub mod reports;
pub mod store;
pub mod tracker;

pub use error::{AppError, AppResult};
pub use store::{MemoryStore, RecordStore};
pub use tracker::{BillOverview, StageOverview, Tracker};

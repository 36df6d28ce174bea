//! Virtualized interactive grid engine
//!
//! Maps a paginated, partially loaded dataset and a runtime column schema
//! onto cell content, and turns raw pointer events into selection changes,
//! column edits, menu state and outward actions. Drawing and fetching are
//! left to the host.

pub mod cell;
pub mod columns;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod menu;
pub mod model;
pub mod observable;
pub mod render;
pub mod rows;
pub mod selection;
pub mod theme;
pub mod viewport;

mod grid;

pub use config::GridConfig;
pub use error::GridError;
pub use error::Result;
pub use grid::*;
pub use observable::Observable;
pub use observable::Subscription;

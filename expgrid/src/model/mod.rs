//! Data model consumed by the grid.

mod loadable;
mod project;
mod record;
mod schema;
mod user;

pub use loadable::*;
pub use project::*;
pub use record::*;
pub use schema::*;
pub use user::*;

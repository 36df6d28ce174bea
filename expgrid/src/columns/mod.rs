//! Column definitions and their resolution.
//!
//! Column ids are split into two groups:
//! - static ids (`selected`, `name`) that always lead the grid and are frozen
//! - dynamic ids, user-ordered, each either a built-in column or derived from
//!   the runtime schema

pub mod builtin;
mod def;
mod layout;
mod resolver;
mod widths;

pub use def::*;
pub use layout::*;
pub use resolver::*;
pub use widths::*;

/// Column id type.
pub type ColumnId = String;

/// The row selection checkbox column.
pub const SELECTION_COLUMN: &str = "selected";

/// The primary label column.
pub const NAME_COLUMN: &str = "name";

/// Static columns, in display order.
pub const STATIC_COLUMNS: [&str; 2] = [SELECTION_COLUMN, NAME_COLUMN];

/// Number of leading static columns in grid index space.
pub const STATIC_COLUMN_COUNT: usize = STATIC_COLUMNS.len();

/// Whether `id` is one of the static columns.
pub fn is_static(id: &str) -> bool {
    STATIC_COLUMNS.contains(&id)
}

/// Whether the user may resize `id`.
pub fn is_resizable(id: &str) -> bool {
    id != SELECTION_COLUMN
}

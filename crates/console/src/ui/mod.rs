//! Presentation primitives
//!
//! Pure rendering helpers; nothing here holds state or talks to the backend.

pub mod badge;
pub mod nav;
pub mod table;
pub mod time;

pub use badge::StatusBadge;
pub use nav::Route;
pub use table::Table;

//! Read cache shared by the page controllers
//!
//! Reads are declared as a [`QueryKey`] plus a fetch function. A mutation
//! invalidates every entry under a key prefix so dependent reads refetch.

mod key;
mod store;

pub use key::{KeyPart, QueryKey};
pub use store::QueryCache;

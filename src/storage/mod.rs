mod entries;
mod schema;
mod types;

pub use schema::Database;
pub use types::{Category, DatabaseError, DeleteOutcome, Entry, NewEntry, UnknownCategory};

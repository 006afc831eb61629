pub mod connector;
pub mod models;
pub mod schema;

pub use connector::{ConnectionManager, Session};

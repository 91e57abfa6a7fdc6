pub mod manager;
pub mod models;
pub mod record;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use record::{RecordError, Resource};
pub use repository::Repository;

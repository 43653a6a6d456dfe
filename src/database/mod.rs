pub mod entity;
pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod stores;

pub use entity::Entity;
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{EntityStore, Page, PageRequest, Sort};
pub use stores::Stores;

pub mod alerts;
pub mod pagination;

pub use alerts::entity_alert;
pub use pagination::pagination_headers;

pub mod price_queries;
pub mod schema;

pub mod config;
pub mod error;
pub mod geo;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod table;

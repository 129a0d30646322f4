pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

pub mod config;
pub mod errors;
pub mod export;
pub mod ingestion;
pub mod llm_client;
pub mod matrix;
pub mod models;
pub mod proposals;
pub mod roster;
pub mod routes;
pub mod session;
pub mod state;

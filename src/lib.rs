pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod middleware;
pub mod observer;
pub mod routes;
pub mod seed;
pub mod types;

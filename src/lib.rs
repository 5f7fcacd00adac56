// Library exports for FlickCraze
// This allows integration tests and the binary to share the server modules

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod uploads;

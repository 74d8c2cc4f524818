pub mod aggregate;
pub mod analysis;
pub mod error;
pub mod geo;
pub mod loader;
pub mod models;
pub mod output;
pub mod report;
pub mod sample;

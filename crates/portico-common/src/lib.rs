pub mod models;
pub mod partition;

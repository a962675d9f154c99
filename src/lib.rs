pub mod aggregation;
pub mod api;
pub mod cache;
pub mod config;
pub mod contracts;
pub mod error;
pub mod handlers;
pub mod models;

pub use error::{AppError, AppResult};

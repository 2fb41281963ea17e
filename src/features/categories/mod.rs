pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::CategoryRegistry;
pub use services::{load_registry, CategoryService};

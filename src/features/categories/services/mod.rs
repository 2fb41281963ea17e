mod category_service;

pub use category_service::{load_registry, CategoryService};

mod category;

pub use category::{CategoryRegistry, ViolationCategory};

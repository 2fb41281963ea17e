mod authority_handler;
mod geocode_handler;
mod violation_handler;

#[cfg(test)]
pub(crate) mod test_support;

pub use authority_handler::*;
pub use geocode_handler::*;
pub use violation_handler::*;

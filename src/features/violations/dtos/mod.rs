mod geocode_dto;
mod status_dto;
mod timeline_dto;
mod violation_dto;

pub use geocode_dto::*;
pub use status_dto::*;
pub use timeline_dto::*;
pub use violation_dto::*;

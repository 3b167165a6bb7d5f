pub mod common_dto;
pub mod dashboard_dto;
pub mod locality_dto;
pub mod mis_report_dto;
pub mod vehicle_dto;

pub use common_dto::*;

pub mod api_response;
pub mod auth_dto;
pub mod fleet_dto;
pub mod order_dto;
pub mod quality_dto;
pub mod report_dto;
pub mod schedule_dto;

pub use api_response::ApiResponse;

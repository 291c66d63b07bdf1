//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! se construyen por request a partir de `AppState` y trabajan sobre los
//! repositorios tipados.

pub mod auth_service;
pub mod availability_service;
pub mod notification_service;
pub mod quality_service;
pub mod report_service;
pub mod schedule_service;
pub mod shipment_service;

pub use auth_service::AuthService;
pub use availability_service::AvailabilityService;
pub use notification_service::NotificationCenter;
pub use quality_service::QualityService;
pub use report_service::ReportService;
pub use schedule_service::SchedulerService;
pub use shipment_service::ShipmentTracker;

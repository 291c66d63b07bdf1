//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos. Cada uno se guarda como
//! documento en su propia colección.

pub mod driver;
pub mod fuel_log;
pub mod notification;
pub mod order;
pub mod quality_check;
pub mod schedule;
pub mod user;
pub mod vehicle;

pub use driver::{Driver, DriverStatus};
pub use fuel_log::FuelLog;
pub use notification::{Notification, NotificationKind};
pub use order::{Order, OrderStatus, ShippingInfo};
pub use quality_check::{QualityCheckLog, ShipmentCondition};
pub use schedule::{Schedule, ScheduleStatus, ShipmentAction};
pub use user::{Role, User, UserResponse};
pub use vehicle::{Vehicle, VehicleStatus};

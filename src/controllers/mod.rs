pub mod driver_controller;
pub mod fuel_controller;
pub mod order_controller;
pub mod vehicle_controller;

//! Controllers
//!
//! Request validation and orchestration between the HTTP handlers and the
//! services and repositories. One controller is built per request.

pub mod dashboard_controller;
pub mod locality_controller;
pub mod mis_report_controller;
pub mod vehicle_controller;

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod telemetry;

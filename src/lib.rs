pub mod app_state;
pub mod configuration;
pub mod domain;
pub mod repository;
pub mod routes;
pub mod service;
pub mod startup;
pub mod telemetry;

pub mod cli;
pub mod configuration;
pub mod dal;
pub mod domain;
pub mod routes;
pub mod services;
pub mod startup;

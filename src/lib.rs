pub mod config;
pub mod constants;
pub mod dashboard;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
pub mod workers;

//! Card rendering service
//!
//! Validates card requests against per-endpoint field specifications, then
//! either renders SVG/HTML rank cards locally or has an external service
//! render a level card and rehosts the image on a public image host.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;

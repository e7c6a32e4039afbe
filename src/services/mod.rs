pub mod chat;
pub mod endpoints;
pub mod image_host;
pub mod pipeline;
pub mod render;
pub mod render_api;
pub mod validation;

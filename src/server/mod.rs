pub mod config;
mod error_response;
mod http_layers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error_response::{status_for, ErrorResponse};
pub use http_layers::*;
pub use server::{make_app, run_server};

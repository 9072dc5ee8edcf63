mod config;
mod http;

pub use config::{ADMIN_SECRET_HEADER, ApiConfig, DEFAULT_API_URL};
pub use http::HttpApi;

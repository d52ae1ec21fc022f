pub mod app_config;
pub mod proxy;

pub use app_config::APP_CONFIG;
pub use proxy::{Protocol, Proxy};

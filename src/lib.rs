pub mod config;
pub mod error;
pub mod mail;
pub mod notify;
pub mod report;
pub mod routes;
pub mod serve;

pub use config::{Config, EnvConfig};
pub use error::Error;
pub use report::LocationReport;
pub use routes::{api_router, AppState};
pub use serve::serve;

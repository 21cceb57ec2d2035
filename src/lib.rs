// Paydesk admin console library: secure identity document viewing

pub mod client;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod guard;
pub mod logging;
pub mod metrics;
pub mod profile;
pub mod render;
pub mod session;
pub mod viewer;
pub mod watermark;

pub use error::PaydeskError;

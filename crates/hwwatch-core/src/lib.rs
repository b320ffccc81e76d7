pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod poller;
pub mod status;
pub mod validate;

pub use api::*;
pub use config::*;
pub use error::*;
pub use notify::*;
pub use poller::*;
pub use status::*;
pub use validate::*;

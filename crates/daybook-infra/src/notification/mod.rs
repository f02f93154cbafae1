//! Mail delivery implementations.

mod log;

#[cfg(feature = "mail")]
mod http;

pub use log::LogMailer;

#[cfg(feature = "mail")]
pub use http::{HttpMailer, HttpMailerConfig};

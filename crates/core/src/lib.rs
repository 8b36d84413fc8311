#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod faq;
pub mod model;
pub mod session;
pub mod time;

pub use error::SessionError;
pub use time::Clock;

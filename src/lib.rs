//! Client for Fastmail masked email addresses over JMAP.
//!
//! [`jmap::JmapClient`] fetches the session resource once and then issues one
//! `MaskedEmail/get` or `MaskedEmail/set` call per request.

pub mod config;
pub mod error;
pub mod jmap;
pub mod models;

pub use error::{Error, Result};
pub use jmap::methods::{MaskedEmailCreate, MaskedEmailUpdate};
pub use jmap::{ClientConfig, JmapClient};
pub use models::{MaskedEmail, MaskedEmailState, Session};

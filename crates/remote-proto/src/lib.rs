//! Shared pieces of the VLC remote: wire types for the player's JSON HTTP
//! API, the command gateway that talks to it, configuration and paths.

pub mod config;
pub mod error;
pub mod gateway;
pub mod platform;
pub mod protocol;

pub use error::{GatewayError, Result};
pub use gateway::{Gateway, HttpTransport, Transport};

//! SSH transport: connection, authentication and the SFTP session

mod client;
mod handler;
mod session;

pub use client::{connect, ConnectParams};
pub use session::{RemoteSession, SessionInfo};

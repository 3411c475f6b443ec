use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Config};
use russh_sftp::client::SftpSession;
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::handler::ClientHandler;
use super::session::{RemoteSession, SessionInfo};
use crate::error::BrowseError;
use crate::sftp_logic::RemotePath;

/// Everything needed to open a session.
#[derive(Debug)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Directory the browser starts in and never leaves upwards.
    pub root_path: RemotePath,
    pub timeout: Duration,
}

/// Open a TCP connection, authenticate with a password and start SFTP.
pub async fn connect(params: &ConnectParams) -> Result<RemoteSession, BrowseError> {
    let addr = format!("{}:{}", params.host, params.port);
    tracing::info!("Connecting to {} as {}", addr, params.username);

    let stream = timeout(params.timeout, TcpStream::connect(&addr))
        .await
        .map_err(|_| BrowseError::NetworkFailure(format!("Timed out connecting to {}", addr)))?
        .map_err(|e| BrowseError::NetworkFailure(format!("Could not reach {}: {}", addr, e)))?;

    match timeout(params.timeout, establish(params, stream)).await {
        Ok(result) => result,
        Err(_) => Err(BrowseError::NetworkFailure(format!(
            "Timed out during SSH handshake with {}",
            addr
        ))),
    }
}

async fn establish(
    params: &ConnectParams,
    stream: TcpStream,
) -> Result<RemoteSession, BrowseError> {
    let config = Config {
        inactivity_timeout: Some(Duration::from_secs(3600)),
        ..Default::default()
    };
    let handler = ClientHandler::new(params.host.clone(), params.port);

    let mut handle = client::connect_stream(Arc::new(config), stream, handler).await?;

    let auth = handle
        .authenticate_password(params.username.as_str(), params.password.expose_secret())
        .await?;
    if !auth.success() {
        tracing::warn!("Password rejected for {}@{}", params.username, params.host);
        return Err(BrowseError::AuthenticationFailure(format!(
            "{}@{} rejected the username or password",
            params.username, params.host
        )));
    }
    tracing::info!("Authenticated as {}", params.username);

    let channel = handle.channel_open_session().await?;
    channel.request_subsystem(true, "sftp").await?;
    let sftp = SftpSession::new(channel.into_stream())
        .await
        .map_err(|e| BrowseError::NetworkFailure(format!("Failed to start SFTP: {}", e)))?;
    tracing::debug!("SFTP subsystem ready on {}:{}", params.host, params.port);

    let info = SessionInfo {
        authenticated: true,
        host: params.host.clone(),
        port: params.port,
        username: params.username.clone(),
        root_path: params.root_path.clone(),
    };
    Ok(RemoteSession::new(handle, sftp, info))
}

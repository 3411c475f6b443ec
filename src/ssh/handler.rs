use std::future::Future;

use russh::client::Handler;
use russh::keys::{HashAlg, PublicKey};

use crate::error::BrowseError;

/// Client-side callbacks for the SSH connection.
///
/// Host keys are accepted without a known_hosts check; the fingerprint is
/// logged so it can be compared by hand.
pub struct ClientHandler {
    host: String,
    port: u16,
}

impl ClientHandler {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

impl Handler for ClientHandler {
    type Error = BrowseError;

    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();
        let algorithm = server_public_key.algorithm().as_str().to_string();
        tracing::info!(
            "Host key for {}:{} is {} ({})",
            self.host,
            self.port,
            fingerprint,
            algorithm
        );
        async move { Ok(true) }
    }
}

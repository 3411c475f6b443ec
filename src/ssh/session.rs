use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::Handle;
use russh::{ChannelMsg, Disconnect};
use russh_sftp::client::error::Error as SftpError;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::{self, AsyncRead, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};

use super::handler::ClientHandler;
use crate::error::BrowseError;
use crate::sftp_logic::{DirectoryEntry, EntryKind, RemoteFs, RemotePath};

/// Gap in shell output after which the login banner counts as complete.
const BANNER_QUIET: Duration = Duration::from_millis(700);

/// Who and where a session is connected to.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub root_path: RemotePath,
}

/// An authenticated SSH connection with an open SFTP channel.
pub struct RemoteSession {
    handle: Handle<ClientHandler>,
    sftp: Mutex<SftpSession>,
    info: SessionInfo,
}

impl std::fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl RemoteSession {
    pub(super) fn new(handle: Handle<ClientHandler>, sftp: SftpSession, info: SessionInfo) -> Self {
        Self {
            handle,
            sftp: Mutex::new(sftp),
            info,
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Open an interactive shell and collect what the server prints on login.
    ///
    /// Reading stops once output has been quiet for a moment, the channel
    /// closes, or `wait` elapses.
    pub async fn read_banner(&self, wait: Duration) -> Result<String, BrowseError> {
        let mut channel = self.handle.channel_open_session().await?;
        channel
            .request_pty(false, "xterm", 80, 24, 0, 0, &[])
            .await?;
        channel.request_shell(false).await?;

        let deadline = Instant::now() + wait;
        let mut output = String::new();
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let mut window = deadline - now;
            if !output.is_empty() {
                window = window.min(BANNER_QUIET);
            }
            match timeout(window, channel.wait()).await {
                Ok(Some(ChannelMsg::Data { data })) => {
                    output.push_str(&String::from_utf8_lossy(&data));
                }
                Ok(Some(ChannelMsg::Eof)) | Ok(Some(ChannelMsg::Close)) | Ok(None) => break,
                Ok(Some(_)) => {}
                Err(_) => break,
            }
        }

        if let Err(e) = channel.close().await {
            tracing::debug!("Closing banner channel failed: {}", e);
        }
        tracing::debug!("Read {} bytes of login banner", output.len());
        Ok(output)
    }

    /// Say goodbye to the server. Errors are logged, not returned.
    pub async fn close(&self) {
        if let Err(e) = self.sftp.lock().await.close().await {
            tracing::debug!("SFTP close failed: {}", e);
        }
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            tracing::debug!("Disconnect failed: {}", e);
        }
        tracing::info!("Disconnected from {}", self.info.host);
    }

    /// Translate a failure, probing the target when the server only sent
    /// the generic failure status.
    async fn classify<Fut>(
        &self,
        err: SftpError,
        path: &RemotePath,
        probe: impl FnOnce() -> Fut,
    ) -> BrowseError
    where
        Fut: std::future::Future<Output = Option<BrowseError>>,
    {
        if BrowseError::is_generic_sftp_failure(&err) {
            if let Some(specific) = probe().await {
                return specific;
            }
        }
        BrowseError::from_sftp(err, path.as_str())
    }

    async fn exists(&self, path: &RemotePath) -> bool {
        let sftp = self.sftp.lock().await;
        sftp.try_exists(path.as_str()).await.unwrap_or(false)
    }

    async fn has_children(&self, path: &RemotePath) -> bool {
        let sftp = self.sftp.lock().await;
        match sftp.read_dir(path.as_str()).await {
            Ok(entries) => entries
                .into_iter()
                .any(|entry| entry.file_name() != "." && entry.file_name() != ".."),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl RemoteFs for RemoteSession {
    async fn read_dir(&self, path: &RemotePath) -> Result<Vec<DirectoryEntry>, BrowseError> {
        let sftp = self.sftp.lock().await;
        let entries = sftp
            .read_dir(path.as_str())
            .await
            .map_err(|e| BrowseError::from_sftp(e, path.as_str()))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.file_name() != "." && entry.file_name() != "..")
            .map(|entry| {
                let metadata = entry.metadata();
                let kind = if metadata.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                DirectoryEntry {
                    name: entry.file_name(),
                    kind,
                    raw_mode: metadata.permissions,
                }
            })
            .collect())
    }

    async fn upload(&self, local: &Path, remote: &RemotePath) -> Result<u64, BrowseError> {
        let mut source = tokio::fs::File::open(local)
            .await
            .map_err(|e| BrowseError::local_io(local, e))?;

        let sftp = self.sftp.lock().await;
        let mut target = sftp
            .open_with_flags(
                remote.as_str(),
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
            )
            .await
            .map_err(|e| BrowseError::from_sftp(e, remote.as_str()))?;

        let bytes = io::copy(&mut source, &mut target).await.map_err(|e| {
            BrowseError::Transfer(format!("{} -> {}: {}", local.display(), remote, e))
        })?;
        target
            .shutdown()
            .await
            .map_err(|e| BrowseError::Transfer(format!("{}: {}", remote, e)))?;
        Ok(bytes)
    }

    async fn download(&self, remote: &RemotePath, local: &Path) -> Result<u64, BrowseError> {
        let sftp = self.sftp.lock().await;
        let mut source = sftp
            .open(remote.as_str())
            .await
            .map_err(|e| BrowseError::from_sftp(e, remote.as_str()))?;

        copy_to_local(&mut source, remote, local).await
    }

    async fn rename(&self, from: &RemotePath, to: &RemotePath) -> Result<(), BrowseError> {
        let result = {
            let sftp = self.sftp.lock().await;
            sftp.rename(from.as_str(), to.as_str()).await
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self
                .classify(err, from, || async {
                    if self.exists(to).await {
                        Some(BrowseError::AlreadyExists(to.to_string()))
                    } else {
                        None
                    }
                })
                .await),
        }
    }

    async fn remove_file(&self, path: &RemotePath) -> Result<(), BrowseError> {
        let sftp = self.sftp.lock().await;
        sftp.remove_file(path.as_str())
            .await
            .map_err(|e| BrowseError::from_sftp(e, path.as_str()))
    }

    async fn remove_dir(&self, path: &RemotePath) -> Result<(), BrowseError> {
        let result = {
            let sftp = self.sftp.lock().await;
            sftp.remove_dir(path.as_str()).await
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self
                .classify(err, path, || async {
                    if self.has_children(path).await {
                        Some(BrowseError::NotEmpty(path.to_string()))
                    } else {
                        None
                    }
                })
                .await),
        }
    }

    async fn create_dir(&self, path: &RemotePath) -> Result<(), BrowseError> {
        let result = {
            let sftp = self.sftp.lock().await;
            sftp.create_dir(path.as_str()).await
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self
                .classify(err, path, || async {
                    if self.exists(path).await {
                        Some(BrowseError::AlreadyExists(path.to_string()))
                    } else {
                        None
                    }
                })
                .await),
        }
    }
}

/// Stream `source` into a new file at `local`. A partially written file is
/// removed when the copy fails.
async fn copy_to_local<R>(
    source: &mut R,
    remote: &RemotePath,
    local: &Path,
) -> Result<u64, BrowseError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut target = tokio::fs::File::create(local)
        .await
        .map_err(|e| BrowseError::local_io(local, e))?;

    let copied = match io::copy(source, &mut target).await {
        Ok(bytes) => target
            .flush()
            .await
            .map(|()| bytes)
            .map_err(|e| BrowseError::local_io(local, e)),
        Err(e) => Err(BrowseError::Transfer(format!(
            "{} -> {}: {}",
            remote,
            local.display(),
            e
        ))),
    };

    if copied.is_err() {
        drop(target);
        if let Err(e) = tokio::fs::remove_file(local).await {
            tracing::warn!("Could not remove partial file {}: {}", local.display(), e);
        }
    }
    copied
}

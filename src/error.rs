use std::path::PathBuf;

use russh_sftp::client::error::Error as SftpError;
use russh_sftp::protocol::StatusCode;
use thiserror::Error;

/// Errors surfaced by the session, navigator and file operations.
///
/// Every variant renders a message suitable for the status bar.
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("No such file or directory: {0}")]
    PathNotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not empty: {0}")]
    NotEmpty(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Local I/O error on {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Unknown storage location: {0}")]
    UnknownLocation(String),
}

impl BrowseError {
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BrowseError::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Translate an SFTP client error for `path` into our own taxonomy,
    /// keeping the server's text in the message.
    pub fn from_sftp(err: SftpError, path: &str) -> Self {
        match err {
            SftpError::Status(status) => {
                let detail = if status.error_message.is_empty() {
                    path.to_string()
                } else {
                    format!("{} ({})", path, status.error_message)
                };
                match status.status_code {
                    StatusCode::NoSuchFile => BrowseError::PathNotFound(detail),
                    StatusCode::PermissionDenied => BrowseError::PermissionDenied(detail),
                    StatusCode::NoConnection | StatusCode::ConnectionLost => {
                        BrowseError::NetworkFailure(detail)
                    }
                    _ => BrowseError::Remote(detail),
                }
            }
            other => BrowseError::Remote(format!("{}: {}", path, other)),
        }
    }

    /// Whether the server answered with the generic SFTP failure status,
    /// which SFTP v3 uses for "exists" and "not empty" alike.
    pub fn is_generic_sftp_failure(err: &SftpError) -> bool {
        matches!(err, SftpError::Status(status) if matches!(status.status_code, StatusCode::Failure))
    }
}

impl From<russh::Error> for BrowseError {
    fn from(err: russh::Error) -> Self {
        BrowseError::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use russh_sftp::protocol::Status;

    fn status(code: StatusCode, message: &str) -> SftpError {
        SftpError::Status(Status {
            id: 7,
            status_code: code,
            error_message: message.to_string(),
            language_tag: "en-US".to_string(),
        })
    }

    #[test]
    fn local_io_message_names_the_path() {
        let err = BrowseError::local_io(
            "/tmp/missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.txt"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn not_empty_message_is_human_readable() {
        let err = BrowseError::NotEmpty("/storage/brno2/home/alice/data".to_string());
        assert_eq!(
            err.to_string(),
            "Directory not empty: /storage/brno2/home/alice/data"
        );
    }

    #[test]
    fn sftp_status_codes_map_to_error_kinds() {
        let path = "/storage/brno2/home/alice/data";

        let err = BrowseError::from_sftp(status(StatusCode::NoSuchFile, "No such file"), path);
        assert!(matches!(&err, BrowseError::PathNotFound(d) if d == &format!("{} (No such file)", path)));

        let err = BrowseError::from_sftp(status(StatusCode::PermissionDenied, ""), path);
        assert!(matches!(&err, BrowseError::PermissionDenied(d) if d == path));

        let err = BrowseError::from_sftp(status(StatusCode::NoConnection, "gone"), path);
        assert!(matches!(err, BrowseError::NetworkFailure(_)));
        let err = BrowseError::from_sftp(status(StatusCode::ConnectionLost, "gone"), path);
        assert!(matches!(err, BrowseError::NetworkFailure(_)));

        let err = BrowseError::from_sftp(status(StatusCode::Failure, "Failure"), path);
        assert!(matches!(&err, BrowseError::Remote(d) if d.contains("Failure")));

        let err = BrowseError::from_sftp(status(StatusCode::OpUnsupported, "nope"), path);
        assert!(matches!(&err, BrowseError::Remote(d) if d.contains("nope")));
    }

    #[test]
    fn non_status_errors_become_remote_errors() {
        let err = BrowseError::from_sftp(SftpError::Timeout, "/data");
        assert!(matches!(&err, BrowseError::Remote(d) if d.starts_with("/data: ")));
    }

    #[test]
    fn only_the_failure_status_counts_as_generic() {
        assert!(BrowseError::is_generic_sftp_failure(&status(StatusCode::Failure, "")));
        assert!(!BrowseError::is_generic_sftp_failure(&status(StatusCode::NoSuchFile, "")));
        assert!(!BrowseError::is_generic_sftp_failure(&SftpError::Timeout));
    }
}

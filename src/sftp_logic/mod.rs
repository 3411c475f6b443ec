//! Remote browsing: navigation state for both panels and file operations

mod local;
#[cfg(test)]
pub mod memfs;
pub mod remote;
mod state;
pub mod transfer;
pub mod types;

pub use remote::Navigator;
pub use state::AppSftpState;
pub use transfer::FileOps;
pub use types::{
    BatchOutcome, DirectoryEntry, EntryKind, FileItem, ListingItem, OpStatus, PanelSide,
    RemoteFs, RemotePath, TransferProgress,
};

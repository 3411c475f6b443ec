//! In-memory remote filesystem used by the unit tests.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{DirectoryEntry, EntryKind, RemoteFs, RemotePath};
use crate::error::BrowseError;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MemFs {
    nodes: Mutex<BTreeMap<String, Node>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl MemFs {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.nodes
            .lock()
            .unwrap()
            .insert("/".to_string(), Node::Dir);
        fs
    }

    /// Creates `path` and any missing parents.
    pub fn with_dir(self, path: &str) -> Self {
        {
            let mut nodes = self.nodes.lock().unwrap();
            let mut current = RemotePath::root();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                current = current.join(segment);
                nodes.entry(current.as_str().to_string()).or_insert(Node::Dir);
            }
        }
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        let parent = RemotePath::new(path).parent();
        let fs = self.with_dir(parent.as_str());
        fs.nodes
            .lock()
            .unwrap()
            .insert(path.to_string(), Node::File(contents.as_bytes().to_vec()));
        fs
    }

    /// Every transfer touching `path` fails.
    pub fn failing_on(self, path: &str) -> Self {
        self.failing.lock().unwrap().insert(path.to_string());
        self
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.lock().unwrap().get(path), Some(Node::Dir))
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File(data)) => Some(String::from_utf8_lossy(data).into_owned()),
            _ => None,
        }
    }

    /// Number of `RemoteFs` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_failing(&self, path: &str) -> Result<(), BrowseError> {
        if self.failing.lock().unwrap().contains(path) {
            return Err(BrowseError::Transfer(format!("{}: simulated failure", path)));
        }
        Ok(())
    }

    fn children(nodes: &BTreeMap<String, Node>, dir: &RemotePath) -> Vec<String> {
        nodes
            .keys()
            .filter(|key| key.as_str() != "/" && RemotePath::new(key.as_str()).parent() == *dir)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RemoteFs for MemFs {
    async fn read_dir(&self, path: &RemotePath) -> Result<Vec<DirectoryEntry>, BrowseError> {
        self.record_call();
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(path.as_str()) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(BrowseError::Remote(format!("{}: not a directory", path)))
            }
            None => return Err(BrowseError::PathNotFound(path.to_string())),
        }

        Ok(Self::children(&nodes, path)
            .into_iter()
            .map(|child| {
                let child_path = RemotePath::new(child.as_str());
                let kind = match nodes.get(&child) {
                    Some(Node::Dir) => EntryKind::Directory,
                    _ => EntryKind::File,
                };
                DirectoryEntry {
                    name: child_path.file_name().unwrap_or_default().to_string(),
                    kind,
                    raw_mode: Some(if kind == EntryKind::Directory { 0o40755 } else { 0o100644 }),
                }
            })
            .collect())
    }

    async fn upload(&self, local: &Path, remote: &RemotePath) -> Result<u64, BrowseError> {
        self.record_call();
        self.check_failing(remote.as_str())?;
        let data = tokio::fs::read(local)
            .await
            .map_err(|e| BrowseError::local_io(local, e))?;
        let mut nodes = self.nodes.lock().unwrap();
        if !matches!(nodes.get(remote.parent().as_str()), Some(Node::Dir)) {
            return Err(BrowseError::PathNotFound(remote.parent().to_string()));
        }
        let len = data.len() as u64;
        nodes.insert(remote.as_str().to_string(), Node::File(data));
        Ok(len)
    }

    async fn download(&self, remote: &RemotePath, local: &Path) -> Result<u64, BrowseError> {
        self.record_call();
        self.check_failing(remote.as_str())?;
        let data = match self.nodes.lock().unwrap().get(remote.as_str()) {
            Some(Node::File(data)) => data.clone(),
            Some(Node::Dir) => {
                return Err(BrowseError::Remote(format!("{}: is a directory", remote)))
            }
            None => return Err(BrowseError::PathNotFound(remote.to_string())),
        };
        tokio::fs::write(local, &data)
            .await
            .map_err(|e| BrowseError::local_io(local, e))?;
        Ok(data.len() as u64)
    }

    async fn rename(&self, from: &RemotePath, to: &RemotePath) -> Result<(), BrowseError> {
        self.record_call();
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(from.as_str()) {
            return Err(BrowseError::PathNotFound(from.to_string()));
        }
        if nodes.contains_key(to.as_str()) {
            return Err(BrowseError::AlreadyExists(to.to_string()));
        }
        let prefix = format!("{}/", from.as_str());
        let moved: Vec<String> = nodes
            .keys()
            .filter(|key| key.as_str() == from.as_str() || key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = nodes.remove(&key) {
                let renamed = format!("{}{}", to.as_str(), &key[from.as_str().len()..]);
                nodes.insert(renamed, node);
            }
        }
        Ok(())
    }

    async fn remove_file(&self, path: &RemotePath) -> Result<(), BrowseError> {
        self.record_call();
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get(path.as_str()) {
            Some(Node::File(_)) => {
                nodes.remove(path.as_str());
                Ok(())
            }
            Some(Node::Dir) => Err(BrowseError::Remote(format!("{}: is a directory", path))),
            None => Err(BrowseError::PathNotFound(path.to_string())),
        }
    }

    async fn remove_dir(&self, path: &RemotePath) -> Result<(), BrowseError> {
        self.record_call();
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get(path.as_str()) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(BrowseError::Remote(format!("{}: not a directory", path)))
            }
            None => return Err(BrowseError::PathNotFound(path.to_string())),
        }
        if !Self::children(&nodes, path).is_empty() {
            return Err(BrowseError::NotEmpty(path.to_string()));
        }
        nodes.remove(path.as_str());
        Ok(())
    }

    async fn create_dir(&self, path: &RemotePath) -> Result<(), BrowseError> {
        self.record_call();
        let mut nodes = self.nodes.lock().unwrap();
        if nodes.contains_key(path.as_str()) {
            return Err(BrowseError::AlreadyExists(path.to_string()));
        }
        if !matches!(nodes.get(path.parent().as_str()), Some(Node::Dir)) {
            return Err(BrowseError::PathNotFound(path.parent().to_string()));
        }
        nodes.insert(path.as_str().to_string(), Node::Dir);
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::error::BrowseError;
use crate::sftp_logic::RemotePath;

pub const DEFAULT_HOST: &str = "skirit.metacentrum.cz";
pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_LOCATION: &str = "brno2";

const USERNAME_PLACEHOLDER: &str = "{username}";

const BUILTIN_LOCATIONS: &[&str] = &[
    "brno11-elixir",
    "brno12-cerit",
    "brno2",
    "budejovice1",
    "liberec3-tul",
    "plzen1",
    "praha2-natur",
    "praha5-elixir",
    "pruhonice1-ibot",
    "vestec1-elixir",
];

/// A named storage area and the template of its home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub name: String,
    /// Remote path with a `{username}` placeholder.
    pub root_template: String,
}

impl StorageLocation {
    pub fn new(name: impl Into<String>, root_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_template: root_template.into(),
        }
    }

    pub fn root_path(&self, username: &str) -> RemotePath {
        RemotePath::new(self.root_template.replace(USERNAME_PLACEHOLDER, username.trim()))
    }
}

pub fn builtin_locations() -> Vec<StorageLocation> {
    BUILTIN_LOCATIONS
        .iter()
        .map(|name| StorageLocation::new(*name, format!("/storage/{}/home/{{username}}", name)))
        .collect()
}

/// Add `extra` locations, replacing built-ins that share a name.
pub fn merge_locations(
    mut base: Vec<StorageLocation>,
    extra: Vec<StorageLocation>,
) -> Vec<StorageLocation> {
    for location in extra {
        match base.iter_mut().find(|l| l.name == location.name) {
            Some(existing) => *existing = location,
            None => base.push(location),
        }
    }
    base
}

pub fn find_location<'a>(
    locations: &'a [StorageLocation],
    name: &str,
) -> Result<&'a StorageLocation, BrowseError> {
    locations
        .iter()
        .find(|l| l.name == name)
        .ok_or_else(|| BrowseError::UnknownLocation(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_all_storages() {
        let locations = builtin_locations();
        assert_eq!(locations.len(), 10);
        assert!(locations.iter().any(|l| l.name == DEFAULT_LOCATION));
        assert_eq!(
            locations[0].root_template,
            "/storage/brno11-elixir/home/{username}"
        );
    }

    #[test]
    fn template_expands_username() {
        let locations = builtin_locations();
        let brno2 = find_location(&locations, "brno2").unwrap();
        assert_eq!(
            brno2.root_path("alice").as_str(),
            "/storage/brno2/home/alice"
        );
    }

    #[test]
    fn unknown_location_is_rejected() {
        let locations = builtin_locations();
        let err = find_location(&locations, "atlantis1").unwrap_err();
        assert!(matches!(err, BrowseError::UnknownLocation(name) if name == "atlantis1"));
    }

    #[test]
    fn extra_locations_override_by_name() {
        let merged = merge_locations(
            builtin_locations(),
            vec![
                StorageLocation::new("brno2", "/scratch/{username}"),
                StorageLocation::new("lab", "/data/lab/{username}"),
            ],
        );
        assert_eq!(merged.len(), 11);
        assert_eq!(
            find_location(&merged, "brno2").unwrap().root_path("bob").as_str(),
            "/scratch/bob"
        );
        assert_eq!(merged.last().map(|l| l.name.as_str()), Some("lab"));
    }
}

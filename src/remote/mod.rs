//! Access to the remote document library.
//!
//! The purge engine only talks to the library through the [`RemoteLibrary`]
//! trait, so the traversal can run against the SharePoint REST client in
//! production and against an in-memory fake in tests.
//!
//! All folder arguments are site-relative (`Shared Documents/Reports`), file
//! arguments are server-relative URLs (`/sites/team/Shared
//! Documents/Reports/q1.xlsx`).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::RemoteError;

pub mod paths;
mod sharepoint;

pub use sharepoint::{SharePointClient, SharePointClientBuilder};

/// A folder returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolderDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    /// Server-relative URL, when the service provides one
    #[serde(rename = "ServerRelativeUrl", default)]
    pub server_relative_url: Option<String>,
}

impl FolderDescriptor {
    pub fn new(name: impl Into<String>, server_relative_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            server_relative_url,
        }
    }
}

/// A file returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    /// Server-relative URL, when the service provides one
    #[serde(rename = "ServerRelativeUrl", default)]
    pub server_relative_url: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, server_relative_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            server_relative_url,
        }
    }

    /// Lower-cased extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// One historical version of a file.
///
/// `label` is for display only; ordering always uses `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionDescriptor {
    #[serde(rename = "ID", deserialize_with = "deserialize_version_id")]
    pub id: String,
    #[serde(rename = "VersionLabel", default)]
    pub label: String,
    #[serde(rename = "Created")]
    pub created_at: DateTime<Utc>,
}

impl VersionDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            created_at,
        }
    }
}

// Version IDs arrive as JSON numbers but are opaque to us.
fn deserialize_version_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Typed operations the purge engine needs from the document library.
///
/// Implementations perform exactly one remote call per method; retrying is
/// the caller's job (see [`crate::retry::Retry`]).
pub trait RemoteLibrary {
    /// Server-relative path of the site root, e.g. `/sites/team` (empty for
    /// the root site).
    fn site_path(&self) -> &str;

    /// Files directly inside a site-relative folder.
    fn list_files(&self, folder: &str) -> Result<Vec<FileDescriptor>, RemoteError>;

    /// Folders directly inside a site-relative folder.
    fn list_subfolders(&self, folder: &str) -> Result<Vec<FolderDescriptor>, RemoteError>;

    /// All versions of a file, identified by its server-relative URL.
    fn get_versions(&self, file_url: &str) -> Result<Vec<VersionDescriptor>, RemoteError>;

    /// Delete one version of a file.
    fn delete_version(&self, file_url: &str, version_id: &str) -> Result<(), RemoteError>;

    /// Whether a site-relative folder exists.
    fn folder_exists(&self, folder: &str) -> Result<bool, RemoteError>;
}

impl<T: RemoteLibrary + ?Sized> RemoteLibrary for &T {
    fn site_path(&self) -> &str {
        (**self).site_path()
    }

    fn list_files(&self, folder: &str) -> Result<Vec<FileDescriptor>, RemoteError> {
        (**self).list_files(folder)
    }

    fn list_subfolders(&self, folder: &str) -> Result<Vec<FolderDescriptor>, RemoteError> {
        (**self).list_subfolders(folder)
    }

    fn get_versions(&self, file_url: &str) -> Result<Vec<VersionDescriptor>, RemoteError> {
        (**self).get_versions(file_url)
    }

    fn delete_version(&self, file_url: &str, version_id: &str) -> Result<(), RemoteError> {
        (**self).delete_version(file_url, version_id)
    }

    fn folder_exists(&self, folder: &str) -> Result<bool, RemoteError> {
        (**self).folder_exists(folder)
    }
}

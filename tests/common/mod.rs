#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, TimeZone, Utc};
use version_sweep::error::RemoteError;
use version_sweep::remote::{FileDescriptor, FolderDescriptor, RemoteLibrary, VersionDescriptor};
use version_sweep::retry::Retry;

pub const SITE_PATH: &str = "/sites/team";

/// A remote call as seen by the fake library
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    Exists(String),
    ListFiles(String),
    ListSubfolders(String),
    GetVersions(String),
    Delete(String, String),
}

/// In-memory document library.
///
/// Folders are keyed by site-relative path; files by server-relative URL.
/// Failures can be queued per call and are returned before the call is
/// served normally.
pub struct FakeLibrary {
    site_path: String,
    folders: BTreeMap<String, Vec<String>>,
    versions: RefCell<BTreeMap<String, Vec<VersionDescriptor>>>,
    failures: RefCell<HashMap<Call, VecDeque<RemoteError>>>,
    calls: RefCell<Vec<Call>>,
    server_urls: bool,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self {
            site_path: SITE_PATH.to_string(),
            folders: BTreeMap::new(),
            versions: RefCell::new(BTreeMap::new()),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            server_urls: true,
        }
    }

    /// Listings leave `ServerRelativeUrl` empty, forcing path fallbacks
    pub fn without_server_urls(mut self) -> Self {
        self.server_urls = false;
        self
    }

    /// Add a folder (and its missing parents)
    pub fn folder(mut self, path: &str) -> Self {
        let mut current = String::new();
        for part in path.split('/') {
            current = if current.is_empty() {
                part.to_string()
            } else {
                format!("{current}/{part}")
            };
            self.folders.entry(current.clone()).or_default();
        }
        self
    }

    /// Add a file with the given versions to a folder
    pub fn file(mut self, folder: &str, name: &str, versions: Vec<VersionDescriptor>) -> Self {
        self = self.folder(folder);
        if let Some(files) = self.folders.get_mut(folder) {
            files.push(name.to_string());
        }
        self.versions
            .borrow_mut()
            .insert(file_url(folder, name), versions);
        self
    }

    /// Queue a failure for the next matching call
    pub fn fail(self, call: Call, error: RemoteError) -> Self {
        self.failures
            .borrow_mut()
            .entry(call)
            .or_default()
            .push_back(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, Call::Delete(..)))
    }

    /// Ids of the versions still present for a file
    pub fn remaining_ids(&self, url: &str) -> Vec<String> {
        self.versions
            .borrow()
            .get(url)
            .map(|versions| versions.iter().map(|v| v.id.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(call.clone());
        match self
            .failures
            .borrow_mut()
            .get_mut(&call)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn server_url(&self, url: String) -> Option<String> {
        self.server_urls.then_some(url)
    }
}

impl RemoteLibrary for FakeLibrary {
    fn site_path(&self) -> &str {
        &self.site_path
    }

    fn list_files(&self, folder: &str) -> Result<Vec<FileDescriptor>, RemoteError> {
        self.record(Call::ListFiles(folder.to_string()))?;
        let files = self.folders.get(folder).ok_or_else(not_found)?;
        Ok(files
            .iter()
            .map(|name| FileDescriptor::new(name.clone(), self.server_url(file_url(folder, name))))
            .collect())
    }

    fn list_subfolders(&self, folder: &str) -> Result<Vec<FolderDescriptor>, RemoteError> {
        self.record(Call::ListSubfolders(folder.to_string()))?;
        if !self.folders.contains_key(folder) {
            return Err(not_found());
        }

        let prefix = format!("{folder}/");
        Ok(self
            .folders
            .keys()
            .filter_map(|path| {
                let name = path.strip_prefix(&prefix)?;
                (!name.contains('/')).then(|| {
                    FolderDescriptor::new(name, self.server_url(format!("{SITE_PATH}/{path}")))
                })
            })
            .collect())
    }

    fn get_versions(&self, file_url: &str) -> Result<Vec<VersionDescriptor>, RemoteError> {
        self.record(Call::GetVersions(file_url.to_string()))?;
        self.versions
            .borrow()
            .get(file_url)
            .cloned()
            .ok_or_else(not_found)
    }

    fn delete_version(&self, file_url: &str, version_id: &str) -> Result<(), RemoteError> {
        self.record(Call::Delete(file_url.to_string(), version_id.to_string()))?;
        let mut versions = self.versions.borrow_mut();
        let list = versions.get_mut(file_url).ok_or_else(not_found)?;
        let before = list.len();
        list.retain(|v| v.id != version_id);
        if list.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    fn folder_exists(&self, folder: &str) -> Result<bool, RemoteError> {
        self.record(Call::Exists(folder.to_string()))?;
        Ok(self.folders.contains_key(folder))
    }
}

pub fn file_url(folder: &str, name: &str) -> String {
    format!("{SITE_PATH}/{folder}/{name}")
}

pub fn not_found() -> RemoteError {
    RemoteError::Status {
        status: 404,
        message: "File Not Found.".to_string(),
    }
}

pub fn forbidden() -> RemoteError {
    RemoteError::Status {
        status: 403,
        message: "Access denied.".to_string(),
    }
}

pub fn throttled() -> RemoteError {
    RemoteError::Status {
        status: 429,
        message: "Too Many Requests".to_string(),
    }
}

/// Retry strategy that never sleeps
pub fn instant_retry() -> Retry<RemoteError> {
    Retry::for_remote().sleeper(|_| {}).build()
}

pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

/// Versions created on the given January days, ids 512, 1024, ...
pub fn versions_on(days: &[u32]) -> Vec<VersionDescriptor> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let n = i as u32 + 1;
            VersionDescriptor::new((n * 512).to_string(), format!("{n}.0"), jan(*day))
        })
        .collect()
}

//! Path handling for the document library.
//!
//! Two path forms are in play:
//! - site-relative folder paths (`Shared Documents/Reports`), used as
//!   arguments to listing calls
//! - server-relative URLs (`/sites/team/Shared Documents/Reports/q1.xlsx`),
//!   returned by the service and used to address files
//!
//! All helpers are plain string manipulation; nothing here talks to the
//! network.

use super::{FileDescriptor, FolderDescriptor};

/// Normalize a site-relative folder path.
///
/// This function:
/// - Converts backslashes to forward slashes
/// - Drops leading, trailing and repeated slashes
/// - Removes `.` components and resolves `..` where possible
pub fn normalize_folder(path: &str) -> String {
    let mut components: Vec<&str> = Vec::new();
    let path = path.replace('\\', "/");

    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                if let Some(last) = components.last()
                    && *last != ".."
                {
                    components.pop();
                    continue;
                }
                components.push(component);
            }
            _ => components.push(component),
        }
    }

    components.join("/")
}

/// Join a site-relative parent folder and a child name.
pub fn join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Server-relative form of a site-relative folder path.
pub fn server_relative(site_path: &str, folder: &str) -> String {
    let site_path = site_path.trim_end_matches('/');
    let folder = folder.trim_start_matches('/');
    if folder.is_empty() {
        if site_path.is_empty() {
            "/".to_string()
        } else {
            site_path.to_string()
        }
    } else {
        format!("{site_path}/{folder}")
    }
}

/// Site-relative form of a server-relative URL.
///
/// Returns `None` when the URL is not under `site_path`. The comparison
/// ignores ASCII case because the service treats URLs case-insensitively.
pub fn site_relative(server_relative_url: &str, site_path: &str) -> Option<String> {
    let site_path = site_path.trim_end_matches('/');
    let url = server_relative_url;

    if url.len() < site_path.len() || !url.is_char_boundary(site_path.len()) {
        return None;
    }
    let (prefix, rest) = url.split_at(site_path.len());
    if !prefix.eq_ignore_ascii_case(site_path) {
        return None;
    }
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    Some(rest.trim_matches('/').to_string())
}

/// Canonical server-relative URL of a file.
///
/// Prefers the URL the service returned; otherwise builds it from the site
/// path, the folder being walked and the file name.
pub fn file_url(site_path: &str, folder: &str, file: &FileDescriptor) -> String {
    match file.server_relative_url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => join(&server_relative(site_path, folder), &file.name),
    }
}

/// Site-relative path of a subfolder found while walking `parent`.
///
/// Prefers the server-provided URL converted to site-relative form; falls
/// back to `parent/name`.
pub fn subfolder_path(site_path: &str, parent: &str, folder: &FolderDescriptor) -> String {
    folder
        .server_relative_url
        .as_deref()
        .and_then(|url| site_relative(url, site_path))
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| join(parent, &folder.name))
}

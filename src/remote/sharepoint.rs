//! SharePoint REST implementation of [`RemoteLibrary`].

use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_LENGTH};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{FileDescriptor, FolderDescriptor, RemoteLibrary, VersionDescriptor, paths};
use crate::error::{RemoteError, Result, SweepError};

const ODATA_JSON: &str = "application/json;odata=nometadata";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// `{"value": ...}` envelope used by every OData response
#[derive(Debug, Deserialize)]
struct OData<T> {
    value: T,
}

/// Blocking client for the SharePoint REST API, authenticated with a bearer
/// token.
#[derive(Debug)]
pub struct SharePointClient {
    http: Client,
    /// Absolute site URL without a trailing slash
    site_url: String,
    /// Server-relative path of the site, without a trailing slash
    site_path: String,
    access_token: String,
}

/// Builder for [`SharePointClient`]
#[derive(Debug, Default)]
pub struct SharePointClientBuilder {
    site_url: Option<String>,
    access_token: Option<String>,
    timeout: Option<Duration>,
}

impl SharePointClientBuilder {
    /// Set the absolute site URL, e.g. `https://contoso.sharepoint.com/sites/team`
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Set the bearer token sent with every request
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the per-request timeout (default: 60 seconds)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SharePointClient> {
        let raw_url = self
            .site_url
            .ok_or_else(|| SweepError::ConfigError("site URL is required".to_string()))?;
        let access_token = self
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| SweepError::ConfigError("access token is required".to_string()))?;

        let parsed = Url::parse(raw_url.trim())
            .map_err(|e| SweepError::ConfigError(format!("invalid site URL '{raw_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SweepError::ConfigError(format!(
                "site URL '{raw_url}' must use http or https"
            )));
        }

        // Server-relative paths returned by the service are not percent-encoded
        let site_path = percent_decode_str(parsed.path())
            .decode_utf8()
            .map_err(|e| SweepError::ConfigError(format!("invalid site URL '{raw_url}': {e}")))?
            .trim_end_matches('/')
            .to_string();
        let site_url = parsed.as_str().trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(concat!("version-sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SweepError::ClientError(e.to_string()))?;

        Ok(SharePointClient {
            http,
            site_url,
            site_path,
            access_token,
        })
    }
}

impl SharePointClient {
    /// Creates a new builder for [`SharePointClient`]
    pub fn builder() -> SharePointClientBuilder {
        SharePointClientBuilder::default()
    }

    /// Absolute site URL the client talks to
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn folder_endpoint(&self, folder: &str, tail: &str) -> String {
        let server_path = paths::server_relative(&self.site_path, folder);
        format!(
            "{}/_api/web/GetFolderByServerRelativeUrl('{}'){tail}",
            self.site_url,
            odata_literal(&server_path)
        )
    }

    fn file_endpoint(&self, file_url: &str, tail: &str) -> String {
        format!(
            "{}/_api/web/GetFileByServerRelativeUrl('{}'){tail}",
            self.site_url,
            odata_literal(file_url)
        )
    }

    fn send(&self, request: RequestBuilder) -> std::result::Result<Response, RemoteError> {
        let response = request
            .bearer_auth(&self.access_token)
            .header(ACCEPT, ODATA_JSON)
            .send()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .unwrap_or_else(|_| "<response body unavailable>".to_string());
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("no reason").to_string()
        } else {
            body
        };

        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn get_value<T: DeserializeOwned>(&self, endpoint: &str) -> std::result::Result<T, RemoteError> {
        let response = self.send(self.http.get(endpoint))?;
        let envelope: OData<T> = response
            .json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(envelope.value)
    }
}

impl RemoteLibrary for SharePointClient {
    fn site_path(&self) -> &str {
        &self.site_path
    }

    fn list_files(&self, folder: &str) -> std::result::Result<Vec<FileDescriptor>, RemoteError> {
        self.get_value(&self.folder_endpoint(folder, "/Files"))
    }

    fn list_subfolders(
        &self,
        folder: &str,
    ) -> std::result::Result<Vec<FolderDescriptor>, RemoteError> {
        self.get_value(&self.folder_endpoint(folder, "/Folders"))
    }

    fn get_versions(
        &self,
        file_url: &str,
    ) -> std::result::Result<Vec<VersionDescriptor>, RemoteError> {
        self.get_value(&self.file_endpoint(file_url, "/Versions"))
    }

    fn delete_version(
        &self,
        file_url: &str,
        version_id: &str,
    ) -> std::result::Result<(), RemoteError> {
        let id: u64 = version_id
            .parse()
            .map_err(|_| RemoteError::Other(format!("invalid version id '{version_id}'")))?;
        let endpoint = self.file_endpoint(file_url, &format!("/Versions/DeleteByID(vid={id})"));
        self.send(self.http.post(&endpoint).header(CONTENT_LENGTH, 0))?;
        Ok(())
    }

    fn folder_exists(&self, folder: &str) -> std::result::Result<bool, RemoteError> {
        match self.get_value(&self.folder_endpoint(folder, "/Exists")) {
            Ok(exists) => Ok(exists),
            Err(RemoteError::Status { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Escape a path for use inside a quoted OData string literal in a URL.
fn odata_literal(path: &str) -> String {
    path.replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(site: &str) -> SharePointClient {
        SharePointClient::builder()
            .site_url(site)
            .access_token("token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_derives_site_path() {
        let client = client("https://contoso.sharepoint.com/sites/team/");
        assert_eq!(client.site_path(), "/sites/team");
        assert_eq!(client.site_url(), "https://contoso.sharepoint.com/sites/team");

        let root = client_root();
        assert_eq!(root.site_path(), "");
    }

    fn client_root() -> SharePointClient {
        client("https://contoso.sharepoint.com")
    }

    #[test]
    fn test_site_path_is_decoded() {
        let encoded = client("https://contoso.sharepoint.com/sites/my%20team");
        assert_eq!(encoded.site_path(), "/sites/my team");
        assert_eq!(
            encoded.folder_endpoint("Shared Documents", "/Files"),
            "https://contoso.sharepoint.com/sites/my%20team/_api/web/\
             GetFolderByServerRelativeUrl('/sites/my team/Shared Documents')/Files"
        );

        // Spaces typed unencoded end up the same
        let typed = client("https://contoso.sharepoint.com/sites/my team");
        assert_eq!(typed.site_path(), "/sites/my team");
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        let err = SharePointClient::builder()
            .site_url("not a url")
            .access_token("t")
            .build()
            .unwrap_err();
        assert!(matches!(err, SweepError::ConfigError(_)));

        let err = SharePointClient::builder()
            .site_url("ftp://contoso.sharepoint.com")
            .access_token("t")
            .build()
            .unwrap_err();
        assert!(matches!(err, SweepError::ConfigError(_)));

        let err = SharePointClient::builder()
            .site_url("https://contoso.sharepoint.com")
            .access_token("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, SweepError::ConfigError(_)));
    }

    #[test]
    fn test_endpoints() {
        let client = client("https://contoso.sharepoint.com/sites/team");
        assert_eq!(
            client.folder_endpoint("Shared Documents/Q1", "/Files"),
            "https://contoso.sharepoint.com/sites/team/_api/web/\
             GetFolderByServerRelativeUrl('/sites/team/Shared Documents/Q1')/Files"
        );
        assert_eq!(
            client.file_endpoint("/sites/team/Docs/O'Brien #1.docx", "/Versions"),
            "https://contoso.sharepoint.com/sites/team/_api/web/\
             GetFileByServerRelativeUrl('/sites/team/Docs/O''Brien %231.docx')/Versions"
        );
    }

    #[test]
    fn test_odata_literal() {
        assert_eq!(odata_literal("a'b"), "a''b");
        assert_eq!(odata_literal("100%?#"), "100%25%3F%23");
    }

    #[test]
    fn test_decode_listings() {
        let files: OData<Vec<FileDescriptor>> = serde_json::from_str(
            r#"{"value": [
                {"Name": "a.txt", "ServerRelativeUrl": "/sites/team/Docs/a.txt", "Length": "12"},
                {"Name": "b.one"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(files.value.len(), 2);
        assert_eq!(
            files.value[0].server_relative_url.as_deref(),
            Some("/sites/team/Docs/a.txt")
        );
        assert!(files.value[1].server_relative_url.is_none());

        let exists: OData<bool> = serde_json::from_str(r#"{"value": true}"#).unwrap();
        assert!(exists.value);

        let versions: OData<Vec<VersionDescriptor>> = serde_json::from_str(
            r#"{"value": [
                {"ID": 512, "VersionLabel": "1.0", "Created": "2024-01-01T00:00:00Z"},
                {"ID": 1024, "VersionLabel": "2.0", "Created": "2024-01-10T00:00:00Z"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(versions.value[1].id, "1024");
    }

    #[test]
    fn test_delete_rejects_non_numeric_id() {
        let client = client("https://contoso.sharepoint.com/sites/team");
        let err = client.delete_version("/sites/team/a.txt", "abc").unwrap_err();
        assert!(matches!(err, RemoteError::Other(_)));
        assert!(!err.is_transient());
    }
}

//! Gateway client - wraps reqwest and converts wire documents into records

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::constants;
use crate::error::StoreError;
use crate::models::AppRecord;

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a transport failure onto the gateway error kind
fn transport_error(e: reqwest::Error) -> StoreError {
    let msg = if e.is_timeout() {
        "request timed out (30s)".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };
    StoreError::UnavailableGateway(msg)
}

// ============================================================================
// Wire documents
// ============================================================================

/// One entry of `GET /apps/`
#[derive(Debug, Deserialize)]
pub struct InstalledAppDoc {
    #[allow(dead_code)] // Carried by the gateway, identity here is the slug
    #[serde(default)]
    pub id: Option<String>,
    pub attributes: InstalledAppAttributes,
    #[serde(default)]
    pub links: AppLinks,
}

#[derive(Debug, Deserialize)]
pub struct InstalledAppAttributes {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppLinks {
    #[serde(default)]
    pub icon: Option<String>,
}

/// Envelope of `GET /registry`
#[derive(Debug, Deserialize)]
pub struct RegistryResponse {
    pub data: Vec<RegistryAppDoc>,
}

/// One registry catalog entry; `name` is the slug, display names and
/// descriptions are localized maps
#[derive(Debug, Deserialize)]
pub struct RegistryAppDoc {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<HashMap<String, String>>,
    #[serde(default)]
    pub description: Option<HashMap<String, String>>,
    #[serde(default)]
    pub versions: RegistryVersions,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistryVersions {
    #[serde(default)]
    pub dev: Vec<String>,
    #[allow(dead_code)] // Published by the registry, only the dev channel is installed
    #[serde(default)]
    pub stable: Vec<String>,
}

// ============================================================================
// Record conversion (pure, unit-testable)
// ============================================================================

/// Pick the requested language, falling back to English
fn localized(map: &Option<HashMap<String, String>>, lang: &str) -> Option<String> {
    let map = map.as_ref()?;
    map.get(lang)
        .or_else(|| map.get(constants::DEFAULT_LANG))
        .cloned()
}

/// Convert registry catalog entries into records.
///
/// Hidden slugs and apps without any dev version are dropped.
pub fn registry_records(docs: Vec<RegistryAppDoc>, lang: &str) -> Vec<AppRecord> {
    docs.into_iter()
        .filter(|doc| !constants::is_hidden(&doc.name))
        .filter(|doc| !doc.versions.dev.is_empty())
        .map(|doc| {
            let name = localized(&doc.full_name, lang).unwrap_or_else(|| doc.name.clone());
            let description = localized(&doc.description, lang).unwrap_or_default();
            AppRecord {
                name: Some(name),
                description: Some(description),
                icon: Some(doc.logo_url.unwrap_or_default()),
                version: doc.versions.dev.last().cloned(),
                installed: Some(false),
                uninstallable: Some(true),
                in_registry: Some(true),
                slug: doc.name,
            }
        })
        .collect()
}

/// Convert installed-app documents into records.
///
/// Only the fields the installed source owns are set, so registry data
/// already in the collection is preserved on merge.
pub fn installed_records(docs: Vec<InstalledAppDoc>) -> Vec<AppRecord> {
    docs.into_iter()
        .filter(|doc| !constants::is_hidden(&doc.attributes.slug))
        .map(|doc| {
            let slug = doc.attributes.slug;
            AppRecord {
                name: doc.attributes.name,
                description: None,
                icon: doc.links.icon,
                version: doc.attributes.version,
                installed: Some(true),
                uninstallable: Some(!constants::is_protected(&slug)),
                in_registry: None,
                slug,
            }
        })
        .collect()
}

// ============================================================================
// Client
// ============================================================================

/// Thin wrapper around reqwest carrying the gateway base URL and token
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GatewayClient {
    pub fn new(config: &Config) -> Self {
        GatewayClient {
            http: create_client(),
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET /registry?filter[type]=webapp`
    pub async fn fetch_registry_apps(&self, lang: &str) -> Result<Vec<AppRecord>, StoreError> {
        let response = self
            .authorize(
                self.http
                    .get(self.url("/registry"))
                    .query(&[("filter[type]", "webapp")]),
            )
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(StoreError::gateway)?;

        let body: RegistryResponse = response.json().await.map_err(StoreError::gateway)?;
        Ok(registry_records(body.data, lang))
    }

    /// `GET /apps/`
    pub async fn fetch_installed_apps(&self) -> Result<Vec<AppRecord>, StoreError> {
        let response = self
            .authorize(self.http.get(self.url("/apps/")))
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(StoreError::gateway)?;

        let docs: Vec<InstalledAppDoc> = response.json().await.map_err(StoreError::gateway)?;
        Ok(installed_records(docs))
    }

    /// `DELETE /apps/{slug}`
    pub async fn uninstall_app(&self, slug: &str) -> Result<(), StoreError> {
        self.authorize(self.http.delete(self.url(&format!("/apps/{}", slug))))
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(StoreError::gateway)?;
        Ok(())
    }

    /// `POST /apps/{slug}?Source=registry://{slug}/dev`
    ///
    /// Returns the installed version when the gateway reports one.
    pub async fn install_app(
        &self,
        slug: &str,
        source: &str,
    ) -> Result<Option<String>, StoreError> {
        let response = self
            .authorize(
                self.http
                    .post(self.url(&format!("/apps/{}", slug)))
                    .query(&[("Source", source)]),
            )
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(StoreError::gateway)?;

        let version = response
            .json::<InstalledAppDoc>()
            .await
            .ok()
            .and_then(|doc| doc.attributes.version);
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_records_localization_fallback() {
        let body: RegistryResponse = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "name": "photos",
                        "full_name": {"en": "Photos", "fr": "Photos FR"},
                        "description": {"en": "Your pictures"},
                        "versions": {"dev": ["1.0.0-dev.1", "1.0.0-dev.2"], "stable": []},
                        "logo_url": "https://registry.example/photos.svg"
                    }
                ]
            }"#,
        )
        .unwrap();

        let records = registry_records(body.data, "fr");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.slug, "photos");
        // fr full_name exists, fr description falls back to en
        assert_eq!(record.name.as_deref(), Some("Photos FR"));
        assert_eq!(record.description.as_deref(), Some("Your pictures"));
        assert_eq!(record.version.as_deref(), Some("1.0.0-dev.2"));
        assert_eq!(record.installed, Some(false));
        assert_eq!(record.in_registry, Some(true));
    }

    #[test]
    fn test_registry_records_drop_versionless_and_hidden() {
        let body: RegistryResponse = serde_json::from_str(
            r#"{
                "data": [
                    {"name": "notes", "versions": {"dev": ["0.1.0"]}},
                    {"name": "no-versions", "versions": {"dev": []}},
                    {"name": "settings", "versions": {"dev": ["2.0.0"]}}
                ]
            }"#,
        )
        .unwrap();

        let records = registry_records(body.data, "en");
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["notes"]);
        // no localized names published: slug is the display name
        assert_eq!(records[0].name.as_deref(), Some("notes"));
    }

    #[test]
    fn test_installed_records_protected_and_hidden() {
        let docs: Vec<InstalledAppDoc> = serde_json::from_str(
            r#"[
                {
                    "id": "io.cirrus.files",
                    "attributes": {"slug": "files", "name": "Files", "version": "3.1.0"},
                    "links": {"icon": "/apps/files/icon"}
                },
                {
                    "id": "io.cirrus.settings",
                    "attributes": {"slug": "settings"}
                },
                {
                    "id": "io.cirrus.notes",
                    "attributes": {"slug": "notes"}
                }
            ]"#,
        )
        .unwrap();

        let records = installed_records(docs);
        assert_eq!(records.len(), 2);

        let files = &records[0];
        assert_eq!(files.slug, "files");
        assert_eq!(files.installed, Some(true));
        assert_eq!(files.uninstallable, Some(false));
        assert_eq!(files.icon.as_deref(), Some("/apps/files/icon"));

        let notes = &records[1];
        assert_eq!(notes.uninstallable, Some(true));
        // fields the installed source does not own stay unset
        assert_eq!(notes.description, None);
        assert_eq!(notes.in_registry, None);
    }
}

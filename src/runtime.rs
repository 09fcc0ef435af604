//! Process-wide service context.
//!
//! The runtime is built once at startup from [`Settings`] and handed to the
//! MCP server behind an `Arc`. Every client is optional: a service whose
//! credentials are missing stays `None`, and the tools that need it answer
//! with a configuration error instead of failing at startup.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{ApiClient, DocsClient, DriveClient, GeminiClient, GitHubClient};
use crate::cli::Settings;
use crate::domain::{AccessTokenSource, DocumentStore, FileStore, SourceHost, TextGenerator};
use crate::session::{GoogleSessionStore, GoogleTokenProvider};

/// Clients for the external services, each present only when configured.
#[derive(Clone, Default)]
pub struct Runtime {
    pub github: Option<Arc<dyn SourceHost>>,
    pub drive: Option<Arc<dyn FileStore>>,
    pub docs: Option<Arc<dyn DocumentStore>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    /// Model name reported alongside analysis results.
    pub generator_model: Option<String>,
}

impl Runtime {
    /// Build every client the settings allow.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let api = ApiClient::new(None)?;
        let mut runtime = Runtime::default();

        match settings.github_token() {
            Some(token) => {
                runtime.github = Some(Arc::new(GitHubClient::new(api.clone(), token.to_string())));
            }
            None => warn!("GITHUB_TOKEN is not set; GitHub tools are disabled"),
        }

        match settings.gemini_api_key() {
            Some(key) => {
                let client = GeminiClient::new(
                    api.clone(),
                    key.to_string(),
                    settings.gemini_model.clone(),
                );
                runtime.generator_model = Some(client.model().to_string());
                runtime.generator = Some(Arc::new(client));
            }
            None => warn!("GEMINI_API_KEY is not set; AI features use fallbacks or are disabled"),
        }

        let store = GoogleSessionStore::new(
            &settings.google_credentials_dir,
            &settings.google_token_file,
        );
        match store.load() {
            Ok(Some(credentials)) => {
                let token_path = store.token_path().to_path_buf();
                let provider =
                    GoogleTokenProvider::new(Arc::new(api.clone()), store, credentials);
                // Fail early on unusable credentials; later calls refresh on expiry.
                match provider.access_token().await {
                    Ok(_) => {
                        let tokens: Arc<dyn AccessTokenSource> = Arc::new(provider);
                        runtime.drive = Some(Arc::new(DriveClient::new(api.clone(), tokens.clone())));
                        runtime.docs = Some(Arc::new(DocsClient::new(api.clone(), tokens)));
                    }
                    Err(e) => warn!(
                        "Google credentials at {:?} are unusable; Drive and Docs tools are disabled: {:#}",
                        token_path, e
                    ),
                }
            }
            Ok(None) => warn!(
                "No Google credentials at {:?}; Drive and Docs tools are disabled",
                store.token_path()
            ),
            Err(e) => warn!("Failed to load Google credentials: {:#}", e),
        }

        info!("🧩 Services configured: {}", runtime.summary());
        Ok(runtime)
    }

    pub fn with_github(mut self, host: Arc<dyn SourceHost>) -> Self {
        self.github = Some(host);
        self
    }

    pub fn with_drive(mut self, store: Arc<dyn FileStore>) -> Self {
        self.drive = Some(store);
        self
    }

    pub fn with_docs(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.docs = Some(store);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>, model: &str) -> Self {
        self.generator = Some(generator);
        self.generator_model = Some(model.to_string());
        self
    }

    pub fn generator(&self) -> Option<&dyn TextGenerator> {
        self.generator.as_deref()
    }

    /// `(service, configured)` pairs in a fixed order.
    pub fn services(&self) -> [(&'static str, bool); 4] {
        [
            ("github", self.github.is_some()),
            ("google_drive", self.drive.is_some()),
            ("google_docs", self.docs.is_some()),
            ("gemini", self.generator.is_some()),
        ]
    }

    pub fn summary(&self) -> String {
        self.services()
            .iter()
            .map(|(name, on)| format!("{}={}", name, if *on { "on" } else { "off" }))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGenerator, FakeSourceHost};

    #[test]
    fn test_empty_runtime_has_no_services() {
        let runtime = Runtime::default();
        assert!(runtime.services().iter().all(|(_, on)| !on));
        assert!(runtime.generator().is_none());
        assert_eq!(
            runtime.summary(),
            "github=off, google_drive=off, google_docs=off, gemini=off"
        );
    }

    #[test]
    fn test_builders_enable_services() {
        let runtime = Runtime::default()
            .with_github(Arc::new(FakeSourceHost::new("octocat")))
            .with_generator(Arc::new(FakeGenerator::default()), "gemini-test");
        assert_eq!(
            runtime.summary(),
            "github=on, google_drive=off, google_docs=off, gemini=on"
        );
        assert_eq!(runtime.generator_model.as_deref(), Some("gemini-test"));
    }

    #[tokio::test]
    async fn test_from_settings_without_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            github_token: None,
            gemini_api_key: Some("your_gemini_api_key_here".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            google_credentials_dir: tmp.path().to_path_buf(),
            google_token_file: "token.json".to_string(),
        };
        let runtime = Runtime::from_settings(&settings).await.unwrap();
        assert!(runtime.services().iter().all(|(_, on)| !on));
    }
}

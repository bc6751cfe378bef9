use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::EnrichConfig;

use super::profile_html;

pub const NO_DESCRIPTION: &str = "<p>No description found</p>";

#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("profile request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("profile page returned status {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    /// Inline HTML fragment, or an inline error paragraph.
    pub description: String,
    pub background_url: String,
}

/// Scrapes community profile pages for a summary and background image. Every
/// outcome, failures included, is cached per profile URL until [`clear`].
///
/// [`clear`]: ProfileEnricher::clear
pub struct ProfileEnricher {
    client: reqwest::Client,
    default_background: String,
    cache: RwLock<HashMap<String, ProfileDetails>>,
}

impl ProfileEnricher {
    pub fn new(config: &EnrichConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            default_background: config.default_background.clone(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn enrich(&self, profile_url: &str) -> ProfileDetails {
        if let Some(hit) = self.cache.read().await.get(profile_url) {
            return hit.clone();
        }

        let details = match self.fetch_page(profile_url).await {
            Ok(html) => ProfileDetails {
                description: profile_html::summary_fragment(&html)
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                background_url: profile_html::background_url(&html)
                    .unwrap_or_else(|| self.default_background.clone()),
            },
            Err(EnrichError::Status(status)) => {
                tracing::warn!(url = %profile_url, status, "Profile page returned an error status");
                ProfileDetails {
                    description: format!("<p>Error: {status}</p>"),
                    background_url: self.default_background.clone(),
                }
            }
            Err(e) => {
                tracing::warn!(url = %profile_url, error = %e, "Profile request failed");
                ProfileDetails {
                    description: String::new(),
                    background_url: self.default_background.clone(),
                }
            }
        };

        self.cache
            .write()
            .await
            .insert(profile_url.to_string(), details.clone());
        details
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cached(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn fetch_page(&self, url: &str) -> Result<String, EnrichError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(EnrichError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn enricher() -> ProfileEnricher {
        ProfileEnricher::new(&EnrichConfig {
            timeout_secs: 5,
            default_background: "https://cdn/default.png".into(),
        })
    }

    #[tokio::test]
    async fn enriches_and_caches_per_url() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/id/shroomer",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    r#"<div class="profile_summary">Hi<br>there</div>
                       <div class="profile_animated_background"><video poster="https://cdn/bg.webm.jpg"></video></div>"#
                }
            }),
        );
        let base = serve(router).await;
        let e = enricher();
        let url = format!("{base}/id/shroomer");

        let first = e.enrich(&url).await;
        assert_eq!(first.description, "Hi<br>there");
        assert_eq!(first.background_url, "https://cdn/bg.webm.jpg");

        let second = e.enrich(&url).await;
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        e.clear().await;
        assert_eq!(e.cached().await, 0);
        e.enrich(&url).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn error_status_becomes_inline_paragraph() {
        let router = Router::new().route("/gone", get(|| async { StatusCode::NOT_FOUND }));
        let base = serve(router).await;
        let details = enricher().enrich(&format!("{base}/gone")).await;
        assert_eq!(details.description, "<p>Error: 404</p>");
        assert_eq!(details.background_url, "https://cdn/default.png");
    }

    #[tokio::test]
    async fn page_without_summary_gets_placeholder() {
        let router = Router::new().route("/plain", get(|| async { "<html><body>nothing</body></html>" }));
        let base = serve(router).await;
        let details = enricher().enrich(&format!("{base}/plain")).await;
        assert_eq!(details.description, NO_DESCRIPTION);
        assert_eq!(details.background_url, "https://cdn/default.png");
    }

    #[tokio::test]
    async fn unreachable_host_yields_empty_description() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let details = enricher().enrich(&format!("http://{addr}/x")).await;
        assert_eq!(details.description, "");
        assert_eq!(details.background_url, "https://cdn/default.png");
    }
}

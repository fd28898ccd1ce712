use crate::config::ImporterConfig;
use crate::error::{Error, Result};
use crate::utils::validation;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

const MAX_REDIRECTS: usize = 10;

/// HTTP fetcher for recipe pages and their images.
///
/// Requests carry a browser-like identity and a per-request timeout. There is
/// no retry: a failed import is retried by the caller as a whole.
pub struct Fetcher {
    client: Client,
    page_timeout: Duration,
    image_timeout: Duration,
    max_page_size: usize,
    max_image_size: usize,
}

impl Fetcher {
    pub fn new(config: &ImporterConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(redirect_policy(config.allow_private_hosts))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            page_timeout: Duration::from_secs(config.fetch_timeout_seconds),
            image_timeout: Duration::from_secs(config.image_timeout_seconds),
            max_page_size: config.max_page_size,
            max_image_size: config.max_image_size,
        })
    }

    /// Fetch a recipe page as text
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let bytes = self.get(url, self.page_timeout, self.max_page_size).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetch raw image bytes
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.get(url, self.image_timeout, self.max_image_size).await?;
        if bytes.is_empty() {
            return Err(Error::Validation(format!("Empty image body from {url}")));
        }
        Ok(bytes)
    }

    async fn get(&self, url: &str, timeout: Duration, max_size: usize) -> Result<Vec<u8>> {
        debug!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        if let Some(content_length) = response.content_length() {
            if content_length > max_size as u64 {
                return Err(Error::Validation(format!(
                    "Response size {content_length} exceeds maximum {max_size}"
                )));
            }
        }

        Self::read_with_limit(response, max_size).await
    }

    async fn read_with_limit(response: Response, max_size: usize) -> Result<Vec<u8>> {
        let bytes = response.bytes().await?;

        if bytes.len() > max_size {
            warn!("Response body of {} bytes over limit {}", bytes.len(), max_size);
            return Err(Error::Validation(format!(
                "Response size {} exceeds maximum {}",
                bytes.len(),
                max_size
            )));
        }

        Ok(bytes.to_vec())
    }
}

/// Follow up to [`MAX_REDIRECTS`] hops, refusing private hosts unless allowed
fn redirect_policy(allow_private_hosts: bool) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error(format!("more than {MAX_REDIRECTS} redirects"));
        }
        if !allow_private_hosts {
            if let Err(e) = validation::validate_import_url(attempt.url().as_str()) {
                let msg = format!("redirect to {} refused: {e}", attempt.url());
                return attempt.error(msg);
            }
        }
        attempt.follow()
    })
}

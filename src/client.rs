use easy_error::{Error, ResultExt};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Found(String),
    NotFound,
}

/// Source of HTML pages. Lets the book be assembled without a network.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Page, Error>;
}

/// Fetches pages over HTTP with a blocking `reqwest` client.
#[derive(Default)]
pub struct SiteClient {
    client: Client,
}

impl SiteClient {
    fn get(&self, url: &str) -> Result<Response, Error> {
        self.client
            .get(url)
            .send()
            .context(format!("Could not retrieve page {url}"))
    }
}

impl Fetch for SiteClient {
    fn fetch(&self, url: &str) -> Result<Page, Error> {
        let response = self.get(url)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Page::NotFound);
        }
        let response = response
            .error_for_status()
            .context(format!("Unexpected response for {url}"))?;
        // Always UTF-8, whatever the Content-Type header claims.
        let contents = response
            .bytes()
            .context(format!("Cannot read page {url}"))?;
        Ok(Page::Found(String::from_utf8_lossy(&contents).to_string()))
    }
}

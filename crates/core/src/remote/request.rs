//! Request construction for the TMDB API.
//!
//! Endpoints are relative paths such as `movie/popular`. They are joined onto
//! the base URL, and the API key is appended as the `api_key` query
//! parameter.

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, Request, Url};

use super::RequestBuilderError;

/// Default TMDB API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const API_KEY_PARAM: &str = "api_key";
const ACCEPT_JSON: &str = "application/json";

/// Characters allowed in a URL path besides ASCII alphanumerics.
/// `?` and `#` are excluded so an endpoint cannot smuggle a query or fragment.
const PATH_PUNCTUATION: &str = "-._~!$&'()*+,;=:@/";

/// Builds GET requests against the TMDB API.
#[derive(Debug, Clone)]
pub struct TmdbRequestBuilder {
    base_url: Url,
    api_key: String,
}

impl TmdbRequestBuilder {
    /// Create a builder, validating the base URL and API key.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RequestBuilderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RequestBuilderError::InvalidOrMissingBaseUrl(format!("{base_url:?}: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(RequestBuilderError::InvalidOrMissingBaseUrl(
                base_url.to_string(),
            ));
        }

        if api_key.is_empty() {
            return Err(RequestBuilderError::MissingApiKey);
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Resolve an endpoint to its full URL, including the API key.
    pub fn url_for(&self, endpoint: &str) -> Result<Url, RequestBuilderError> {
        if !is_valid_endpoint(endpoint) {
            return Err(RequestBuilderError::MalformedUrl(endpoint.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestBuilderError::MalformedUrl(endpoint.to_string()))?
            .pop_if_empty()
            .extend(endpoint.split('/'));
        url.query_pairs_mut()
            .clear()
            .append_pair(API_KEY_PARAM, &self.api_key);

        Ok(url)
    }

    /// Build a request for `endpoint` with the given method.
    pub fn build(&self, endpoint: &str, method: Method) -> Result<Request, RequestBuilderError> {
        let url = self.url_for(endpoint)?;
        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        Ok(request)
    }
}

fn is_valid_endpoint(endpoint: &str) -> bool {
    !endpoint.is_empty()
        && !endpoint.starts_with('/')
        && !endpoint.ends_with('/')
        && endpoint
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PATH_PUNCTUATION.contains(c))
}

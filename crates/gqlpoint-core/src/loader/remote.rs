//! Loader for remote schemas exposed through introspection

use crate::document::AstDocument;
use crate::error::{LoaderError, LoaderResult};
use crate::introspection::{from_value, ClientSchema, INTROSPECTION_QUERY};
use crate::options::LoadOptions;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Options key holding extra request headers
pub const HEADERS_EXTENSION: &str = "headers";
/// Options key selecting the HTTP method (`GET` or `POST`)
pub const METHOD_EXTENSION: &str = "method";

/// Fetches a remote schema by running the introspection query
#[derive(Debug, Clone, Default)]
pub struct UrlLoader {
    client: Client,
}

impl UrlLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, timeouts, TLS)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Introspect the endpoint at `url` and return its schema as a document
    pub async fn load(&self, url: &Url, options: &LoadOptions) -> LoaderResult<AstDocument> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LoaderError::UnsupportedScheme {
                url: url.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let method = request_method(options)?;
        let headers = request_headers(options)?;
        debug!(url = %url, method = %method, headers = headers.len(), "Introspecting remote schema");

        let request = if method == Method::GET {
            let mut url = url.clone();
            url.query_pairs_mut()
                .append_pair("query", INTROSPECTION_QUERY);
            self.client.get(url)
        } else {
            self.client
                .post(url.clone())
                .json(&json!({ "query": INTROSPECTION_QUERY }))
        };

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| LoaderError::http_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LoaderError::http_error(url.as_str(), e))?;

        let source = Path::new(url.as_str());
        let client = ClientSchema::build(from_value(body, source)?, source)?;
        let document = client.to_document(url.as_str())?;
        info!(url = %url, types = client.type_names().len(), "Loaded remote schema");
        Ok(document)
    }
}

fn request_method(options: &LoadOptions) -> LoaderResult<Method> {
    match options.string_extension(METHOD_EXTENSION)? {
        None => Ok(Method::POST),
        Some(method) if method.eq_ignore_ascii_case("post") => Ok(Method::POST),
        Some(method) if method.eq_ignore_ascii_case("get") => Ok(Method::GET),
        Some(other) => Err(LoaderError::invalid_extension(
            METHOD_EXTENSION,
            format!("unsupported method '{}', expected GET or POST", other),
        )),
    }
}

fn request_headers(options: &LoadOptions) -> LoaderResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in options.string_map_extension(HEADERS_EXTENSION)? {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            LoaderError::invalid_extension(HEADERS_EXTENSION, format!("'{}': {}", name, e))
        })?;
        let header_value = HeaderValue::from_str(&value).map_err(|e| {
            LoaderError::invalid_extension(HEADERS_EXTENSION, format!("'{}': {}", name, e))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

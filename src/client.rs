//! Main Raven Tools client implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::date;
use crate::error::{Error, Result};
use crate::method::{fields, Operation};
use crate::request::{build_url, Params};
use crate::response::{decode, ApiResponse, Format};
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::types::LinkBatch;

const DEFAULT_ENDPOINT: &str = "https://api.raventools.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    api_key: String,
    endpoint: String,
    format: Format,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new client builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            format: Format::Json,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            transport: None,
        }
    }

    /// Set the API endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the response format requested from the service.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the request timeout used by the default transport.
    ///
    /// Has no effect when a custom transport is injected.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Inject a transport, replacing the built-in HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("API key is required".into()));
        }

        // Warn about insecure connections
        if !self.endpoint.starts_with("https://") {
            warn!(
                endpoint = %self.endpoint,
                "API endpoint is not using HTTPS. This is insecure."
            );
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeout)?),
        };

        Ok(Client {
            api_key: self.api_key,
            endpoint: self.endpoint,
            format: self.format,
            transport,
            last_request: Mutex::new(None),
        })
    }
}

/// The main Raven Tools API client.
///
/// # Example
///
/// ```rust,no_run
/// use raventools::Client;
///
/// fn main() -> Result<(), raventools::Error> {
///     let client = Client::builder("your-api-key").build()?;
///
///     let domains = client.list_domains()?;
///     println!("{:?}", domains.as_json());
///
///     let rank = client.get_rank(
///         "www.example.com",
///         "example keyword",
///         "2011-01-01",
///         "2011-01-31",
///         "all",
///     )?;
///     println!("{:?}", rank.as_json());
///     Ok(())
/// }
/// ```
pub struct Client {
    api_key: String,
    endpoint: String,
    format: Format,
    transport: Arc<dyn Transport>,
    last_request: Mutex<Option<String>>,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    // === Profile ===

    /// Profile information for the account the key belongs to.
    pub fn get_profile_info(&self) -> Result<ApiResponse> {
        self.dispatch(Operation::ProfileInfo, Params::new())
    }

    // === Domains ===

    /// Domains registered on the profile.
    pub fn list_domains(&self) -> Result<ApiResponse> {
        self.dispatch(Operation::Domains, Params::new())
    }

    /// Register a domain, tracked on the given engine IDs.
    ///
    /// Engine IDs come from [`list_engines`](Client::list_engines); at
    /// least one is required.
    pub fn add_domain(&self, domain: &str, engines: &[u32]) -> Result<ApiResponse> {
        require("add_domain", "domain", domain)?;
        self.dispatch(
            Operation::AddDomain,
            Params::new()
                .set(fields::DOMAIN, domain)
                .set(fields::ENGINE_ID, engines),
        )
    }

    /// Remove a domain from the profile.
    pub fn remove_domain(&self, domain: &str) -> Result<ApiResponse> {
        require("remove_domain", "domain", domain)?;
        self.dispatch(Operation::RemoveDomain, Params::new().set(fields::DOMAIN, domain))
    }

    /// Tracking details for one domain.
    pub fn get_domain_info(&self, domain: &str) -> Result<ApiResponse> {
        require("get_domain_info", "domain", domain)?;
        self.dispatch(Operation::DomainInfo, Params::new().set(fields::DOMAIN, domain))
    }

    // === Engines ===

    /// Catalog of search engines available for rank tracking.
    pub fn list_engines(&self) -> Result<ApiResponse> {
        self.dispatch(Operation::Engines, Params::new())
    }

    // === Rankings ===

    /// Rank history for one keyword on one domain over a date range.
    ///
    /// Dates are normalized to `YYYY-MM-DD` before transmission, so
    /// human forms like `Jan 1, 2011` are accepted. Pass `all` as the
    /// engine to cover every engine the domain is tracked on.
    pub fn get_rank(
        &self,
        domain: &str,
        keyword: &str,
        start_date: &str,
        end_date: &str,
        engine: &str,
    ) -> Result<ApiResponse> {
        require("get_rank", "domain", domain)?;
        require("get_rank", "keyword", keyword)?;
        require("get_rank", "engine", engine)?;
        let start = normalized_date("get_rank", "start_date", start_date)?;
        let end = normalized_date("get_rank", "end_date", end_date)?;
        self.dispatch(
            Operation::Rank,
            Params::new()
                .set(fields::DOMAIN, domain)
                .set(fields::KEYWORD, keyword)
                .set(fields::START_DATE, start)
                .set(fields::END_DATE, end)
                .set(fields::ENGINE, engine),
        )
    }

    /// Rank history for every keyword tracked on a domain.
    ///
    /// The range end is optional; the service defaults it when absent.
    pub fn get_rank_all(
        &self,
        domain: &str,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Result<ApiResponse> {
        require("get_rank_all", "domain", domain)?;
        let start = normalized_date("get_rank_all", "start_date", start_date)?;
        let mut params = Params::new()
            .set(fields::DOMAIN, domain)
            .set(fields::START_DATE, start);
        if let Some(end_date) = end_date {
            let end = normalized_date("get_rank_all", "end_date", end_date)?;
            params = params.set(fields::END_DATE, end);
        }
        self.dispatch(Operation::RankAll, params)
    }

    /// The best-ranking week for a domain, optionally narrowed to one
    /// keyword.
    pub fn get_rank_max_week(&self, domain: &str, keyword: Option<&str>) -> Result<ApiResponse> {
        require("get_rank_max_week", "domain", domain)?;
        let mut params = Params::new().set(fields::DOMAIN, domain);
        if let Some(keyword) = keyword {
            params = params.set(fields::KEYWORD, keyword);
        }
        self.dispatch(Operation::RankMaxWeek, params)
    }

    // === Competitors & keywords ===

    /// Competitor domains tracked against a domain.
    pub fn list_competitors(&self, domain: &str) -> Result<ApiResponse> {
        require("list_competitors", "domain", domain)?;
        self.dispatch(Operation::Competitors, Params::new().set(fields::DOMAIN, domain))
    }

    /// Keywords tracked on a domain.
    pub fn list_keywords(&self, domain: &str) -> Result<ApiResponse> {
        require("list_keywords", "domain", domain)?;
        self.dispatch(Operation::Keywords, Params::new().set(fields::DOMAIN, domain))
    }

    /// Keywords tracked on a domain, with their tags.
    pub fn list_keywords_with_tags(&self, domain: &str) -> Result<ApiResponse> {
        require("list_keywords_with_tags", "domain", domain)?;
        self.dispatch(Operation::KeywordsTags, Params::new().set(fields::DOMAIN, domain))
    }

    /// Start tracking a keyword on a domain.
    pub fn add_keyword(&self, domain: &str, keyword: &str) -> Result<ApiResponse> {
        require("add_keyword", "domain", domain)?;
        require("add_keyword", "keyword", keyword)?;
        self.dispatch(
            Operation::AddKeyword,
            Params::new()
                .set(fields::KEYWORD, keyword)
                .set(fields::DOMAIN, domain),
        )
    }

    /// Stop tracking a keyword on a domain.
    pub fn remove_keyword(&self, domain: &str, keyword: &str) -> Result<ApiResponse> {
        require("remove_keyword", "domain", domain)?;
        require("remove_keyword", "keyword", keyword)?;
        self.dispatch(
            Operation::RemoveKeyword,
            Params::new()
                .set(fields::KEYWORD, keyword)
                .set(fields::DOMAIN, domain),
        )
    }

    // === Link manager ===

    /// Links recorded for a domain, optionally filtered by tag.
    pub fn list_links(&self, domain: &str, tag: Option<&str>) -> Result<ApiResponse> {
        require("list_links", "domain", domain)?;
        let mut params = Params::new().set(fields::DOMAIN, domain);
        if let Some(tag) = tag {
            params = params.set(fields::TAG, tag);
        }
        self.dispatch(Operation::GetLinks, params)
    }

    /// Create link records. The result maps each created record's
    /// remote ID to its outcome.
    pub fn add_links(&self, domain: &str, batch: impl Into<LinkBatch>) -> Result<ApiResponse> {
        self.mutate_links(Operation::AddLinks, "add_links", domain, batch.into())
    }

    /// Update existing link records, keyed by their `link_id`.
    pub fn update_links(&self, domain: &str, batch: impl Into<LinkBatch>) -> Result<ApiResponse> {
        self.mutate_links(Operation::UpdateLinks, "update_links", domain, batch.into())
    }

    /// Delete link records, keyed by their `link_id`.
    pub fn delete_links(&self, domain: &str, batch: impl Into<LinkBatch>) -> Result<ApiResponse> {
        self.mutate_links(Operation::DeleteLinks, "delete_links", domain, batch.into())
    }

    /// Catalog of website types used by link records.
    pub fn list_website_types(&self) -> Result<ApiResponse> {
        self.dispatch(Operation::GetWebsiteTypes, Params::new())
    }

    /// Catalog of link types used by link records.
    pub fn list_link_types(&self) -> Result<ApiResponse> {
        self.dispatch(Operation::GetLinkTypes, Params::new())
    }

    // === Generic calls ===

    /// Invoke an operation by wire name with an explicit parameter bag.
    ///
    /// The typed methods above are usually what you want; this entry
    /// point exists for scripting against the registry directly. The
    /// bag is validated against the operation's field contract exactly
    /// as the typed methods are.
    pub fn call(&self, method: &str, params: Params) -> Result<ApiResponse> {
        self.dispatch(Operation::resolve(method)?, params)
    }

    /// Invoke an operation and return the raw JSON body, undecoded.
    pub fn call_json(&self, method: &str, params: Params) -> Result<String> {
        self.fetch_body(Operation::resolve(method)?, &params, Format::Json)
    }

    /// Invoke an operation and return the raw XML body, undecoded.
    pub fn call_xml(&self, method: &str, params: Params) -> Result<String> {
        self.fetch_body(Operation::resolve(method)?, &params, Format::Xml)
    }

    // === Key validation ===

    /// Check an API key against the live service.
    ///
    /// Builds a default client and probes the cheapest read-only
    /// operation. Every failure on every layer collapses to `false`;
    /// this never raises.
    pub fn validate_api_key(api_key: impl Into<String>) -> bool {
        match Client::builder(api_key).build() {
            Ok(client) => client.validate_key(),
            Err(_) => false,
        }
    }

    /// Probe the service with this client's key and transport.
    ///
    /// The key counts as valid when the domains listing decodes to a
    /// JSON array.
    pub fn validate_key(&self) -> bool {
        matches!(
            self.dispatch_as(Operation::Domains, Params::new(), Format::Json),
            Ok(ApiResponse::Json(serde_json::Value::Array(_)))
        )
    }

    // === Introspection ===

    /// The URL of the most recently built request, for diagnostics.
    ///
    /// The URL embeds the API key; treat it as a secret. Log output
    /// only ever carries a redacted form.
    pub fn last_request_url(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }

    // === Internal methods ===

    fn dispatch(&self, operation: Operation, params: Params) -> Result<ApiResponse> {
        self.dispatch_as(operation, params, self.format)
    }

    fn dispatch_as(
        &self,
        operation: Operation,
        params: Params,
        format: Format,
    ) -> Result<ApiResponse> {
        let body = self.fetch_body(operation, &params, format)?;
        decode(&body, format)
    }

    fn mutate_links(
        &self,
        operation: Operation,
        name: &'static str,
        domain: &str,
        batch: LinkBatch,
    ) -> Result<ApiResponse> {
        require(name, "domain", domain)?;
        let payload = batch.into_field_value()?;
        self.dispatch(
            operation,
            Params::new()
                .set(fields::DOMAIN, domain)
                .set(fields::LINK, payload),
        )
    }

    fn fetch_body(&self, operation: Operation, params: &Params, format: Format) -> Result<String> {
        let url = build_url(&self.endpoint, &self.api_key, operation, params, format)?;
        *self.last_request.lock().unwrap() = Some(url.clone());
        debug!(
            method = operation.wire_name(),
            url = %redact_key(&url),
            "dispatching API request"
        );

        let RawResponse { status, body } = self.transport.fetch(&url)?;
        if status != 200 && status != 201 {
            return Err(Error::Transport {
                code: status,
                message: format!("Response: {body}"),
            });
        }
        if body.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }
        debug!(
            method = operation.wire_name(),
            status,
            bytes = body.len(),
            "received API response"
        );
        Ok(body)
    }
}

fn require(operation: &'static str, argument: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument {
            operation,
            argument,
            reason: "was not set as part of this request".into(),
        });
    }
    Ok(())
}

fn normalized_date(operation: &'static str, argument: &'static str, value: &str) -> Result<String> {
    require(operation, argument, value)?;
    date::normalize(value).ok_or_else(|| Error::InvalidArgument {
        operation,
        argument,
        reason: format!("`{value}` is not a recognizable date"),
    })
}

/// Blank out the key parameter's value so request URLs can be logged.
fn redact_key(url: &str) -> String {
    match url.find("?key=") {
        Some(at) => {
            let value_start = at + "?key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|offset| value_start + offset)
                .unwrap_or(url.len());
            format!("{}[redacted]{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

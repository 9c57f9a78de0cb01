//! REST access to the launched server
//!
//! [`ServerApi`] is the seam between the provisioning steps and HTTP. The
//! steps decide which statuses are acceptable; implementations only report
//! what the server said.

use std::cell::OnceCell;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::credential::AccessToken;
use crate::error::Result;
use crate::error::http::{credential, protocol, unexpected_status};
use crate::settings::{BasicCredentials, Endpoints};

/// Per-request timeout for calls to the local server
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Audience granting access to every service
pub const WILDCARD_AUDIENCE: &str = "*@*";

/// Operations the provisioning steps need from a running server
pub trait ServerApi {
    /// Probe the health endpoint. `Err` means the request never got a response.
    fn ping(&self) -> Result<u16>;

    /// Exchange the bootstrap token for a refreshable admin token
    fn mint_admin_token(&self, bootstrap: &AccessToken) -> Result<AccessToken>;

    /// Set the custom base URL, returning the raw status
    fn set_base_url(&self, base_url: &str) -> Result<u16>;

    /// Fetch the full XML configuration document
    fn fetch_configuration(&self) -> Result<String>;

    /// Replace the XML configuration document
    fn push_configuration(&self, document: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    audience: &'a str,
    refreshable: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// [`ServerApi`] over HTTP.
///
/// The blocking client owns a runtime thread, so it is only built on the
/// first request. Until then the process environment may still be mutated.
#[derive(Debug, Clone)]
pub struct HttpServerApi {
    client: OnceCell<Client>,
    endpoints: Endpoints,
    credentials: BasicCredentials,
}

impl HttpServerApi {
    pub fn new(endpoints: Endpoints, credentials: BasicCredentials) -> Self {
        Self {
            client: OnceCell::new(),
            endpoints,
            credentials,
        }
    }

    /// Whether a request has been made yet
    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn artifactory_url(&self, path: &str) -> String {
        format!("{}{path}", with_trailing_slash(&self.endpoints.artifactory))
    }

    fn access_url(&self, path: &str) -> String {
        format!("{}{path}", with_trailing_slash(&self.endpoints.access))
    }

    fn with_basic_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    fn configuration_url(&self) -> String {
        self.artifactory_url("api/system/configuration")
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

impl ServerApi for HttpServerApi {
    fn ping(&self) -> Result<u16> {
        let request = self.client()?.get(self.artifactory_url("api/system/ping"));
        let response = self.with_basic_auth(request).send()?;
        Ok(response.status().as_u16())
    }

    fn mint_admin_token(&self, bootstrap: &AccessToken) -> Result<AccessToken> {
        let body = TokenRequest {
            audience: WILDCARD_AUDIENCE,
            refreshable: true,
        };
        let response = self
            .client()?
            .post(self.access_url("api/v1/tokens"))
            .bearer_auth(bootstrap.value())
            .json(&body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(credential(format!(
                "token endpoint responded {}",
                status.as_u16()
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .map_err(|e| credential(format!("unreadable token response: {e}")))?;
        if parsed.access_token.is_empty() {
            return Err(credential("admin access token is empty"));
        }

        Ok(AccessToken::new(parsed.access_token, WILDCARD_AUDIENCE))
    }

    fn set_base_url(&self, base_url: &str) -> Result<u16> {
        let request = self
            .client()?
            .put(self.artifactory_url("api/system/configuration/baseUrl"))
            .header(CONTENT_TYPE, "text/plain")
            .body(base_url.to_string());
        let response = self.with_basic_auth(request).send()?;
        Ok(response.status().as_u16())
    }

    fn fetch_configuration(&self) -> Result<String> {
        let request = self.client()?.get(self.configuration_url());
        let response = self.with_basic_auth(request).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(unexpected_status(
                "GETing Artifactory configuration",
                status.as_u16(),
            ));
        }

        let body = response.text()?;
        if body.is_empty() {
            return Err(protocol("Artifactory configuration response is empty"));
        }
        Ok(body)
    }

    fn push_configuration(&self, document: &str) -> Result<()> {
        let request = self
            .client()?
            .post(self.configuration_url())
            .header(CONTENT_TYPE, "application/xml")
            .body(document.to_string());
        let response = self.with_basic_auth(request).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(unexpected_status(
                "POSTing Artifactory configuration",
                status.as_u16(),
            ));
        }
        Ok(())
    }
}

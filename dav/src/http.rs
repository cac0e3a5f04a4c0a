// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport with authentication over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};

use crate::config::{AuthMethod, DavConfig};
use crate::error::DavError;
use crate::transport::{DavReply, DavRequest, Transport};

/// [`Transport`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth: AuthMethod,
}

impl HttpTransport {
    /// Creates a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or HTTP client creation fails.
    pub fn new(config: &DavConfig) -> Result<Self, DavError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth: config.auth.clone(),
        })
    }

    /// Adds authentication headers.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            AuthMethod::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthMethod::Bearer { token } => req.bearer_auth(token),
            AuthMethod::None => req,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: DavRequest) -> Result<DavReply, DavError> {
        let url = request.path.to_url(&self.base_url)?;
        let method = Method::from_bytes(request.method.as_ref().as_bytes())
            .map_err(|e| DavError::Config(format!("Invalid method: {e}")))?;

        let mut req = self.authorize(self.client.request(method, url));
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp.text().await?;
        tracing::debug!(status, bytes = body.len(), "received reply");

        Ok(DavReply {
            status,
            headers,
            body,
        })
    }
}

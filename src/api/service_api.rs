use crate::config::{Config, IdentifierForwarding};
use crate::error::{ActivatorError, Result};
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the per-line service call: one authenticated GET, no retries.
pub struct ServiceApi {
    client: reqwest::Client,
    url: Url,
    token: String,
    forwarding: IdentifierForwarding,
    identifier_param: String,
}

impl ServiceApi {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("device-activator/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: cfg.service_url.clone(),
            token: cfg.service_token.clone(),
            forwarding: cfg.forward_identifier,
            identifier_param: cfg.identifier_param.clone(),
        })
    }

    /// URL requested for `identifier` under the configured forwarding mode.
    pub fn request_url(&self, identifier: &str) -> Result<Url> {
        let mut url = self.url.clone();
        match self.forwarding {
            IdentifierForwarding::Omit => {}
            IdentifierForwarding::Query => {
                url.query_pairs_mut()
                    .append_pair(&self.identifier_param, identifier);
            }
            IdentifierForwarding::Path => {
                let unusable = ActivatorError::UnusableUrl {
                    url: self.url.clone(),
                    reason: "cannot carry a path segment",
                };
                url.path_segments_mut()
                    .map_err(|()| unusable)?
                    .pop_if_empty()
                    .push(identifier);
            }
        }
        Ok(url)
    }

    /// GET the service. Any non-2xx status is an error.
    pub async fn fetch(&self, identifier: &str) -> Result<ServiceResponse> {
        let url = self.request_url(identifier)?;
        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ActivatorError::UpstreamStatus { status, url });
        }

        let body = resp.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        debug!(%url, %status, bytes = body.len(), "service responded");
        Ok(ServiceResponse { body, value })
    }
}

/// Decoded service response together with the text it was decoded from.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub body: String,
    pub value: Value,
}

impl ServiceResponse {
    /// Single-line rendering written to the output file. The body is kept
    /// verbatim unless it spans several lines, in which case the compact JSON
    /// form is used.
    pub fn to_line(&self) -> Result<String> {
        let body = self.body.trim_end();
        if body.contains(['\n', '\r']) {
            Ok(serde_json::to_string(&self.value)?)
        } else {
            Ok(body.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn api(forwarding: IdentifierForwarding, url: &str) -> ServiceApi {
        let cfg = Config::resolve(Settings {
            token: Some("tok".into()),
            db_user: Some("u".into()),
            db_password: Some("p".into()),
            service_url: Some(Url::parse(url).unwrap()),
            forward_identifier: forwarding,
            ..Settings::default()
        })
        .unwrap();
        ServiceApi::new(&cfg).unwrap()
    }

    fn response(body: &str) -> ServiceResponse {
        ServiceResponse {
            body: body.to_string(),
            value: serde_json::from_str(body).unwrap(),
        }
    }

    #[test]
    fn omit_sends_the_same_url_for_every_line() {
        let api = api(IdentifierForwarding::Omit, "http://svc.local/astros.json");
        assert_eq!(
            api.request_url("42").unwrap(),
            api.request_url("43").unwrap()
        );
    }

    #[test]
    fn query_forwarding_appends_encoded_identifier() {
        let api = api(IdentifierForwarding::Query, "http://svc.local/devices?v=1");
        assert_eq!(
            api.request_url("a b&c").unwrap().as_str(),
            "http://svc.local/devices?v=1&id=a+b%26c"
        );
    }

    #[test]
    fn path_forwarding_appends_a_segment() {
        let api = api(IdentifierForwarding::Path, "http://svc.local/devices/");
        assert_eq!(
            api.request_url("42/x").unwrap().as_str(),
            "http://svc.local/devices/42%2Fx"
        );
    }

    #[test]
    fn single_line_body_is_kept_verbatim() {
        assert_eq!(
            response("{\"ok\": true}\n").to_line().unwrap(),
            "{\"ok\": true}"
        );
    }

    #[test]
    fn multi_line_body_is_compacted() {
        assert_eq!(
            response("{\n  \"ok\": true,\n  \"n\": [1, 2]\n}").to_line().unwrap(),
            "{\"ok\":true,\"n\":[1,2]}"
        );
    }
}

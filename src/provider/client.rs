//! Provider clients: the seam between the refresh cycle and the file endpoint.

use std::time::Duration;

use crate::core::errors::{DashError, ProviderFailure, Result};
use crate::provider::records::RecordSet;

/// Source of file records polled once per tick.
///
/// `try_fetch` is the strict contract and reports why a poll failed.
/// `fetch` is what the refresh cycle consumes: every failure collapses into
/// an empty set, so an outage and an empty provider look the same on screen.
pub trait FileProvider {
    fn try_fetch(&self) -> Result<RecordSet>;

    fn fetch(&self) -> RecordSet {
        self.try_fetch().unwrap_or_default()
    }

    /// Human-readable endpoint description for logs and status lines.
    fn endpoint(&self) -> &str;
}

impl<P: FileProvider + ?Sized> FileProvider for &P {
    fn try_fetch(&self) -> Result<RecordSet> {
        (**self).try_fetch()
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Blocking HTTP client for `GET /files`.
///
/// Every call is bounded by `timeout`, which covers connect and read.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    url: String,
    agent: ureq::Agent,
}

impl HttpProvider {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .redirects(0)
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }

    fn failure(&self, failure: ProviderFailure) -> DashError {
        DashError::provider(self.url.clone(), failure)
    }
}

impl FileProvider for HttpProvider {
    fn try_fetch(&self) -> Result<RecordSet> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(self.failure(ProviderFailure::Status(code)));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(self.failure(ProviderFailure::Transport(transport.to_string())));
            }
        };

        if response.status() != 200 {
            return Err(self.failure(ProviderFailure::Status(response.status())));
        }

        let body = response
            .into_string()
            .map_err(|e| self.failure(ProviderFailure::Body(e.to_string())))?;

        RecordSet::from_json(&body).map_err(|e| self.failure(ProviderFailure::Body(e.to_string())))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

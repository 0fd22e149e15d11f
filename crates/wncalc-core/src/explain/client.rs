//! Blocking HTTP transport for the explanation service.

use serde::Deserialize;
use std::time::Duration;

use super::{ExplanationRequest, ExplanationTransport, TransportError};
use crate::config::ExplainConfig;

#[derive(Debug, Deserialize)]
struct ExplanationResponse {
    explanation: String,
}

/// POSTs `{scenario, inputs, results}` as JSON and reads `{explanation}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Unreachable(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ExplainConfig) -> Result<Self, TransportError> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ExplanationTransport for HttpTransport {
    fn send(&self, request: &ExplanationRequest) -> Result<String, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, scenario = %request.scenario(), "sending explanation request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body: ExplanationResponse = response
            .json()
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(body.explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::run;
    use crate::types::ScenarioId;
    use crate::validation::ScenarioInput;

    #[test]
    fn test_from_config() {
        let transport = HttpTransport::from_config(&ExplainConfig::default()).unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:3000/api/explain");
    }

    #[test]
    fn test_unreachable_endpoint() {
        // port 9 (discard) on loopback is closed in test environments
        let transport = HttpTransport::new("http://127.0.0.1:9/api/explain", Duration::from_secs(2)).unwrap();
        let raw: ScenarioInput = [
            ("samplingRate", "8000"),
            ("sourceDataRate", "64000"),
            ("quantizationBits", "8"),
            ("sourceCompressionRatio", "0.5"),
            ("channelCodeRate", "0.75"),
            ("interleavingFactor", "4"),
            ("burstOverhead", "10"),
        ]
        .into_iter()
        .collect();
        let calc = run(ScenarioId::WirelessComm, &raw).unwrap();
        let request = ExplanationRequest::build(&calc.input, &calc.result).unwrap();
        assert!(matches!(transport.send(&request), Err(TransportError::Unreachable(_))));
    }
}

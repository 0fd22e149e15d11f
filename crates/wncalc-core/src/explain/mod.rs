//! Explanation Requests — packaging a finished calculation for the explainer
//!
//! The natural-language explanation comes from an external HTTP service.
//! This module owns the client side of that boundary:
//!
//! - [`ExplanationRequest`]: immutable `{scenario, inputs, results}` snapshot
//! - [`ExplanationTransport`]: the network seam (HTTP in [`client`], fakes in tests)
//! - [`Explanation`]: the displayed outcome, either the service text or one of
//!   two fixed failure messages
//! - [`session::ExplanationSession`]: at most one live request; a newer
//!   submission supersedes older ones
//! - [`summary`]: local summary used when no service is configured
//!
//! A request is only built from a result that already exists, and nothing
//! here can change that result.
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::calculator::run;
//! use wncalc_core::explain::ExplanationRequest;
//! use wncalc_core::validation::ScenarioInput;
//! use wncalc_core::ScenarioId;
//!
//! let raw: ScenarioInput = [
//!     ("transmitterPower", "30"),
//!     ("transmitterGain", "15"),
//!     ("receiverGain", "12"),
//!     ("frequency", "2.4"),
//!     ("distance", "5"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let calc = run(ScenarioId::LinkBudget, &raw).unwrap();
//! let request = ExplanationRequest::build(&calc.input, &calc.result).unwrap();
//! let body = request.to_json().unwrap();
//! assert!(body.contains(r#""scenario":"link_budget""#));
//! ```

#[cfg(feature = "explain")]
pub mod client;
pub mod prompt;
pub mod session;
pub mod summary;

use serde::Serialize;
use std::fmt;

use crate::types::{CalcError, CalculationResult, ScenarioId};
use crate::validation::ValidatedInput;

#[cfg(feature = "explain")]
pub use client::HttpTransport;
pub use session::{ExplanationSession, PendingExplanation};

/// Shown when the service answered with a non-success status or an
/// unreadable body.
pub const SERVICE_ERROR_MESSAGE: &str =
    "Unable to generate AI explanation at this time. Please check your backend connection.";

/// Shown when the service could not be reached at all.
pub const SERVICE_UNREACHABLE_MESSAGE: &str =
    "Unable to connect to AI explanation service. Please ensure the backend is running.";

/// Wire body sent to the explanation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationRequest {
    scenario: ScenarioId,
    inputs: ValidatedInput,
    results: CalculationResult,
}

impl ExplanationRequest {
    /// Snapshot an input and the result computed from it.
    ///
    /// Fails if the two belong to different scenarios.
    pub fn build(
        input: &ValidatedInput,
        result: &CalculationResult,
    ) -> Result<Self, CalcError> {
        if input.scenario() != result.scenario() {
            return Err(CalcError::ScenarioMismatch {
                expected: result.scenario(),
                actual: input.scenario(),
            });
        }
        Ok(Self {
            scenario: result.scenario(),
            inputs: input.clone(),
            results: result.clone(),
        })
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn inputs(&self) -> &ValidatedInput {
        &self.inputs
    }

    pub fn results(&self) -> &CalculationResult {
        &self.results
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Transport failure, classified by how far the request got.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service answered with a non-success HTTP status.
    #[error("explanation service returned HTTP {0}")]
    Status(u16),

    /// The service could not be reached (connect failure, timeout, DNS).
    #[error("explanation service unreachable: {0}")]
    Unreachable(String),

    /// A success response whose body was not `{explanation: string}`.
    #[error("invalid explanation response: {0}")]
    Decode(String),
}

/// Sends one request and returns the explanation text.
pub trait ExplanationTransport: Send + Sync {
    fn send(&self, request: &ExplanationRequest) -> Result<String, TransportError>;
}

/// What the user sees in the explanation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// Text returned by the service.
    Provided(String),
    /// Service reachable but failed.
    ServiceError,
    /// Service unreachable.
    Unreachable,
}

impl Explanation {
    /// Map a transport outcome to what is displayed.
    pub fn resolve(outcome: Result<String, TransportError>) -> Self {
        match outcome {
            Ok(text) => Explanation::Provided(text),
            Err(TransportError::Status(_)) | Err(TransportError::Decode(_)) => {
                Explanation::ServiceError
            }
            Err(TransportError::Unreachable(_)) => Explanation::Unreachable,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Explanation::Provided(text) => text,
            Explanation::ServiceError => SERVICE_ERROR_MESSAGE,
            Explanation::Unreachable => SERVICE_UNREACHABLE_MESSAGE,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Explanation::Provided(_))
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Send `request` over `transport` and map the outcome, logging the round trip.
pub fn request_explanation(
    transport: &dyn ExplanationTransport,
    request: &ExplanationRequest,
) -> Explanation {
    let outcome = transport.send(request);
    match &outcome {
        Ok(text) => tracing::info!(scenario = %request.scenario(), chars = text.len(), "explanation received"),
        Err(e) => tracing::warn!(scenario = %request.scenario(), error = %e, "explanation request failed"),
    }
    Explanation::resolve(outcome)
}

//! Explanation session with supersession.
//!
//! Each [`ExplanationSession::submit`] takes a new generation number and
//! runs the transport on a worker thread. When the worker finishes it
//! publishes its explanation only if no newer submission (or cancel) has
//! happened since, so a slow reply for an old calculation can never replace
//! the explanation of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use super::{request_explanation, Explanation, ExplanationRequest, ExplanationTransport};
use crate::types::ScenarioId;

/// Explanation currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub generation: u64,
    pub scenario: ScenarioId,
    pub explanation: Explanation,
}

/// Handle to one in-flight explanation request.
#[derive(Debug)]
pub struct PendingExplanation {
    generation: u64,
    handle: JoinHandle<Explanation>,
}

impl PendingExplanation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker finishes. Returns its explanation whether or
    /// not it was published; `None` if the worker panicked.
    pub fn wait(self) -> Option<Explanation> {
        self.handle.join().ok()
    }
}

/// Owns the transport and the displayed explanation for one user session.
#[derive(Clone)]
pub struct ExplanationSession {
    transport: Arc<dyn ExplanationTransport>,
    generation: Arc<AtomicU64>,
    published: Arc<Mutex<Option<Published>>>,
}

impl ExplanationSession {
    pub fn new<T: ExplanationTransport + 'static>(transport: T) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<dyn ExplanationTransport>) -> Self {
        Self {
            transport,
            generation: Arc::new(AtomicU64::new(0)),
            published: Arc::new(Mutex::new(None)),
        }
    }

    /// Generation of the most recent submission or cancel.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Supersede everything in flight and send `request`.
    ///
    /// Clears the displayed explanation; it belonged to the previous result.
    pub fn submit(&self, request: ExplanationRequest) -> std::io::Result<PendingExplanation> {
        let generation = self.advance();

        let transport = Arc::clone(&self.transport);
        let latest = Arc::clone(&self.generation);
        let published = Arc::clone(&self.published);
        let scenario = request.scenario();

        let handle = thread::Builder::new()
            .name("wncalc-explain".to_string())
            .spawn(move || {
                let explanation = request_explanation(transport.as_ref(), &request);

                let mut slot = lock(&published);
                if latest.load(Ordering::SeqCst) == generation {
                    *slot = Some(Published {
                        generation,
                        scenario,
                        explanation: explanation.clone(),
                    });
                } else {
                    tracing::debug!(generation, %scenario, "discarding superseded explanation");
                }
                explanation
            })?;

        Ok(PendingExplanation { generation, handle })
    }

    /// Supersede everything in flight without sending anything new.
    pub fn cancel(&self) {
        let generation = self.advance();
        tracing::debug!(generation, "explanation requests cancelled");
    }

    /// The explanation on display, if the latest submission has finished.
    pub fn current(&self) -> Option<Published> {
        lock(&self.published).clone()
    }

    fn advance(&self) -> u64 {
        let mut slot = lock(&self.published);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = None;
        generation
    }
}

impl std::fmt::Debug for ExplanationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationSession")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

fn lock(slot: &Mutex<Option<Published>>) -> MutexGuard<'_, Option<Published>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::run;
    use crate::explain::{TransportError, SERVICE_UNREACHABLE_MESSAGE};
    use crate::validation::ScenarioInput;
    use std::collections::HashMap;
    use std::sync::mpsc::{self, Receiver, Sender};

    type Reply = Result<String, TransportError>;

    /// Holds each scenario's reply until the test releases it.
    #[derive(Default)]
    struct GatedTransport {
        gates: Mutex<HashMap<ScenarioId, Receiver<Reply>>>,
    }

    impl GatedTransport {
        fn gate(&self, scenario: ScenarioId) -> Sender<Reply> {
            let (tx, rx) = mpsc::channel();
            self.gates.lock().unwrap().insert(scenario, rx);
            tx
        }
    }

    impl ExplanationTransport for GatedTransport {
        fn send(&self, request: &ExplanationRequest) -> Reply {
            let rx = self.gates.lock().unwrap().remove(&request.scenario());
            match rx {
                Some(rx) => rx.recv().unwrap_or_else(|_| Err(TransportError::Unreachable("gate dropped".into()))),
                None => Err(TransportError::Unreachable("no gate".into())),
            }
        }
    }

    fn request(scenario: ScenarioId) -> ExplanationRequest {
        let pairs: &[(&str, &str)] = match scenario {
            ScenarioId::LinkBudget => &[
                ("transmitterPower", "30"),
                ("transmitterGain", "15"),
                ("receiverGain", "12"),
                ("frequency", "2.4"),
                ("distance", "5"),
            ],
            _ => &[
                ("subcarrierSpacing", "15"),
                ("symbolDuration", "66.7"),
                ("cyclicPrefixLength", "4.7"),
                ("modulationScheme", "QPSK"),
                ("numSubcarriers", "1200"),
                ("numResourceBlocks", "100"),
                ("subcarriersPerRB", "12"),
                ("parallelRBs", "50"),
            ],
        };
        let raw: ScenarioInput = pairs.iter().copied().collect();
        let calc = run(scenario, &raw).unwrap();
        ExplanationRequest::build(&calc.input, &calc.result).unwrap()
    }

    #[test]
    fn test_single_submission_publishes() {
        let transport = Arc::new(GatedTransport::default());
        let session = ExplanationSession::with_transport(transport.clone());

        let gate = transport.gate(ScenarioId::LinkBudget);
        let pending = session.submit(request(ScenarioId::LinkBudget)).unwrap();
        assert!(session.current().is_none());

        gate.send(Ok("The link closes with 30 dB margin.".into())).unwrap();
        pending.wait().unwrap();

        let shown = session.current().unwrap();
        assert_eq!(shown.scenario, ScenarioId::LinkBudget);
        assert_eq!(shown.explanation.text(), "The link closes with 30 dB margin.");
    }

    #[test]
    fn test_stale_reply_after_newer_is_discarded() {
        let transport = Arc::new(GatedTransport::default());
        let session = ExplanationSession::with_transport(transport.clone());

        let old_gate = transport.gate(ScenarioId::Ofdm);
        let old = session.submit(request(ScenarioId::Ofdm)).unwrap();
        let new_gate = transport.gate(ScenarioId::LinkBudget);
        let new = session.submit(request(ScenarioId::LinkBudget)).unwrap();
        assert!(new.generation() > old.generation());

        new_gate.send(Ok("newer".into())).unwrap();
        new.wait().unwrap();
        old_gate.send(Ok("older".into())).unwrap();
        assert_eq!(old.wait(), Some(Explanation::Provided("older".into())));

        let shown = session.current().unwrap();
        assert_eq!(shown.explanation.text(), "newer");
        assert_eq!(shown.scenario, ScenarioId::LinkBudget);
    }

    #[test]
    fn test_stale_reply_before_newer_is_discarded() {
        let transport = Arc::new(GatedTransport::default());
        let session = ExplanationSession::with_transport(transport.clone());

        let old_gate = transport.gate(ScenarioId::Ofdm);
        let old = session.submit(request(ScenarioId::Ofdm)).unwrap();
        let new_gate = transport.gate(ScenarioId::LinkBudget);
        let new = session.submit(request(ScenarioId::LinkBudget)).unwrap();

        old_gate.send(Ok("older".into())).unwrap();
        old.wait().unwrap();
        assert!(session.current().is_none());

        new_gate.send(Err(TransportError::Unreachable("refused".into()))).unwrap();
        new.wait().unwrap();
        assert_eq!(session.current().unwrap().explanation.text(), SERVICE_UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_cancel_discards_in_flight() {
        let transport = Arc::new(GatedTransport::default());
        let session = ExplanationSession::with_transport(transport.clone());

        let gate = transport.gate(ScenarioId::Ofdm);
        let pending = session.submit(request(ScenarioId::Ofdm)).unwrap();
        session.cancel();
        gate.send(Ok("late".into())).unwrap();
        pending.wait().unwrap();

        assert!(session.current().is_none());
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_submit_clears_previous_explanation() {
        let transport = Arc::new(GatedTransport::default());
        let session = ExplanationSession::with_transport(transport.clone());

        let gate = transport.gate(ScenarioId::Ofdm);
        let first = session.submit(request(ScenarioId::Ofdm)).unwrap();
        gate.send(Ok("first".into())).unwrap();
        first.wait().unwrap();
        assert!(session.current().is_some());

        let _gate = transport.gate(ScenarioId::LinkBudget);
        let _second = session.submit(request(ScenarioId::LinkBudget)).unwrap();
        assert!(session.current().is_none());
    }
}

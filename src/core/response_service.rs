use tokio::sync::mpsc;

use crate::core::controller::ResolveRequest;
use crate::core::providers::{Resolution, ResolveError};

pub type ResolutionMessage = (u64, Result<Resolution, ResolveError>);

/// Runs provider calls on background tasks and reports each result, tagged
/// with its request id, on a single channel.
#[derive(Clone)]
pub struct ResponseService {
    tx: mpsc::UnboundedSender<ResolutionMessage>,
}

impl ResponseService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ResolutionMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn(&self, request: ResolveRequest) {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            let message = request.run().await;
            let _ = tx_clone.send(message);
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, request_id: u64, result: Result<Resolution, ResolveError>) {
        let _ = self.tx.send((request_id, result));
    }
}

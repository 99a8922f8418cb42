use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Token lifecycle notifications delivered to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEvent {
    /// The platform accepted the token; the session persists.
    Confirmed,
    /// The token was rejected or cleared; the session is gone.
    Invalidated,
}

/// Cloneable reporting side of the tracker, handed to services that
/// observe authorization results (for now, the download worker).
#[derive(Clone)]
pub struct TokenNotifier {
    tx: Sender<TokenEvent>,
}

impl TokenNotifier {
    pub fn report_confirmed(&self) {
        let _ = self.tx.send(TokenEvent::Confirmed);
    }

    pub fn report_invalidated(&self) {
        let _ = self.tx.send(TokenEvent::Invalidated);
    }
}

/// Observer registration for token changes, scoped to the run of the
/// event loop. The receiving side lives on the UI thread; dropping the
/// tracker drops the subscription.
pub struct TokenTracker {
    tx: Sender<TokenEvent>,
    rx: Receiver<TokenEvent>,
}

impl TokenTracker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn notifier(&self) -> TokenNotifier {
        TokenNotifier {
            tx: self.tx.clone(),
        }
    }

    /// Drain one pending event, if any.
    pub fn try_recv(&self) -> Option<TokenEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new()
    }
}

use async_lock::Mutex;
use futures::channel::oneshot;

use crate::model::{PhoneCodeReceivedEvent, PhoneCodeSentEvent};

/// A subscription that delivers at most one event and then completes.
///
/// `None` means the channel completed without an event (the event hub was
/// dropped before the native layer reported anything).
pub struct OneShotSubscription<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> OneShotSubscription<T> {
    pub async fn recv(self) -> Option<T> {
        self.receiver.await.ok()
    }
}

/// Fan-out point for the two out-of-band phone verification notifications.
///
/// The native layer pushes `code sent` / `code received` moments here; callers
/// observe them through independent one-shot subscriptions, separately from
/// the main sign-in flow. Each notification resolves every subscription that
/// was pending at that moment, exactly once.
pub struct PhoneVerificationEvents {
    code_sent: Mutex<Vec<oneshot::Sender<PhoneCodeSentEvent>>>,
    code_received: Mutex<Vec<oneshot::Sender<PhoneCodeReceivedEvent>>>,
}

impl PhoneVerificationEvents {
    pub fn new() -> Self {
        Self {
            code_sent: Mutex::new(Vec::new()),
            code_received: Mutex::new(Vec::new()),
        }
    }

    /// Subscribes to the next `code sent` notification.
    pub async fn on_code_sent(&self) -> OneShotSubscription<PhoneCodeSentEvent> {
        let (sender, receiver) = oneshot::channel();
        self.code_sent.lock().await.push(sender);
        OneShotSubscription { receiver }
    }

    /// Subscribes to the next `code received` notification.
    pub async fn on_code_received(&self) -> OneShotSubscription<PhoneCodeReceivedEvent> {
        let (sender, receiver) = oneshot::channel();
        self.code_received.lock().await.push(sender);
        OneShotSubscription { receiver }
    }

    /// Reports that an SMS with a verification code was dispatched.
    pub async fn notify_code_sent(&self, event: PhoneCodeSentEvent) {
        log::debug!("phone verification code sent: {}", event.verification_id);
        let pending = std::mem::take(&mut *self.code_sent.lock().await);
        for sender in pending {
            let _ = sender.send(event.clone());
        }
    }

    /// Reports that a verification code was received on the device.
    pub async fn notify_code_received(&self, event: PhoneCodeReceivedEvent) {
        log::debug!(
            "phone verification code received: {}",
            event.verification_id
        );
        let pending = std::mem::take(&mut *self.code_received.lock().await);
        for sender in pending {
            let _ = sender.send(event.clone());
        }
    }
}

impl Default for PhoneVerificationEvents {
    fn default() -> Self {
        Self::new()
    }
}

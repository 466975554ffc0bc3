use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};

use crate::error::AuthResult;

pub type NextFn<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;
pub type ErrorFn = Arc<dyn Fn(&dyn Error) + Send + Sync + 'static>;
pub type CompleteFn = Arc<dyn Fn() + Send + Sync + 'static>;

/// Callback bundle for observing a single-emission flow.
///
/// At most one of `next`-then-`complete`, bare `complete`, or `error` fires
/// per subscription; never more than one terminal signal.
#[derive(Clone)]
pub struct PartialObserver<T> {
    pub next: Option<NextFn<T>>,
    pub error: Option<ErrorFn>,
    pub complete: Option<CompleteFn>,
}

impl<T> PartialObserver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(callback));
        self
    }

    pub fn with_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn Error) + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(callback));
        self
    }

    pub fn with_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.complete = Some(Arc::new(callback));
        self
    }
}

impl<T> Default for PartialObserver<T> {
    fn default() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }
}

/// Handle for cancelling an in-flight sign-in subscription.
///
/// Cancellation aborts the underlying flow at its next suspension point and
/// suppresses every observer callback from that moment on.
#[derive(Clone)]
pub struct SignInSubscription {
    handle: AbortHandle,
}

impl SignInSubscription {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_aborted()
    }
}

/// Wires a single-emission flow to an observer.
///
/// The returned future drives the flow and dispatches the terminal signal; the
/// caller spawns it on whatever task queue the platform provides. Flow
/// outcomes map onto the observer as: `Ok(Some(v))` emits `next(v)` then
/// `complete`, `Ok(None)` emits a bare `complete`, `Err(e)` emits `error(e)`.
pub fn subscribe_single<T, F>(
    flow: F,
    observer: PartialObserver<T>,
) -> (SignInSubscription, impl Future<Output = ()>)
where
    F: Future<Output = AuthResult<Option<T>>>,
{
    let (handle, registration) = AbortHandle::new_pair();
    let subscription = SignInSubscription { handle };
    let canceller = subscription.clone();

    let task = async move {
        let outcome = match Abortable::new(flow, registration).await {
            Ok(outcome) => outcome,
            // Aborted mid-flight: nothing may be emitted any more.
            Err(_aborted) => return,
        };
        if canceller.is_cancelled() {
            return;
        }
        match outcome {
            Ok(Some(value)) => {
                if let Some(next) = &observer.next {
                    next(&value);
                }
                if let Some(complete) = &observer.complete {
                    complete();
                }
            }
            Ok(None) => {
                if let Some(complete) = &observer.complete {
                    complete();
                }
            }
            Err(err) => {
                if let Some(error) = &observer.error {
                    error(&err);
                }
            }
        }
    };

    (subscription, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthBridgeError;
    use futures::executor::block_on;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded {
        next: Vec<String>,
        errors: Vec<String>,
        completions: usize,
    }

    fn recording_observer(log: &Arc<Mutex<Recorded>>) -> PartialObserver<String> {
        let next_log = log.clone();
        let error_log = log.clone();
        let complete_log = log.clone();
        PartialObserver::new()
            .with_next(move |value: &String| next_log.lock().unwrap().next.push(value.clone()))
            .with_error(move |err| error_log.lock().unwrap().errors.push(err.to_string()))
            .with_complete(move || complete_log.lock().unwrap().completions += 1)
    }

    #[test]
    fn value_emits_next_then_complete_once() {
        let log = Arc::new(Mutex::new(Recorded::default()));
        let (_subscription, task) =
            subscribe_single(async { Ok(Some("session".to_string())) }, recording_observer(&log));
        block_on(task);

        let log = log.lock().unwrap();
        assert_eq!(log.next, vec!["session"]);
        assert_eq!(log.completions, 1);
        assert!(log.errors.is_empty());
    }

    #[test]
    fn empty_outcome_completes_without_emission() {
        let log = Arc::new(Mutex::new(Recorded::default()));
        let (_subscription, task) =
            subscribe_single(async { Ok(None) }, recording_observer(&log));
        block_on(task);

        let log = log.lock().unwrap();
        assert!(log.next.is_empty());
        assert_eq!(log.completions, 1);
        assert!(log.errors.is_empty());
    }

    #[test]
    fn failure_emits_single_error() {
        let log = Arc::new(Mutex::new(Recorded::default()));
        let (_subscription, task) = subscribe_single(
            async { Err::<Option<String>, _>(AuthBridgeError::Native("denied".into())) },
            recording_observer(&log),
        );
        block_on(task);

        let log = log.lock().unwrap();
        assert!(log.next.is_empty());
        assert_eq!(log.completions, 0);
        assert_eq!(log.errors, vec!["Native sign-in error: denied"]);
    }

    #[test]
    fn cancellation_suppresses_every_callback() {
        let log = Arc::new(Mutex::new(Recorded::default()));
        let (subscription, task) = subscribe_single(
            async { Ok(Some("session".to_string())) },
            recording_observer(&log),
        );
        subscription.cancel();
        block_on(task);

        let log = log.lock().unwrap();
        assert!(log.next.is_empty());
        assert_eq!(log.completions, 0);
        assert!(log.errors.is_empty());
    }
}

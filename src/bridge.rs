use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::credential::AuthCredential;
use crate::error::AuthResult;
use crate::model::{
    GoogleSignInOptions, NativeSignInResult, PhoneSignInOptions, ProviderData, SignInOutcome,
    SignInRequest, UserCredential,
};
use crate::observe::{subscribe_single, PartialObserver, SignInSubscription};
use crate::phone::PhoneVerificationEvents;
use crate::plugin::{AuthBackend, NativeAuthPlugin, PluginRegistry};
use crate::provider::{
    APPLE_PROVIDER_ID, FACEBOOK_PROVIDER_ID, GOOGLE_PROVIDER_ID, PHONE_PROVIDER_ID,
    TWITTER_PROVIDER_ID,
};

/// Routes sign-in requests to the native layer and exchanges the raw result
/// for a backend session.
///
/// Every flow is the same two-stage chain: one native call, then one
/// credential exchange, producing a single terminal outcome. There is no
/// shared state between attempts; cloning the bridge is cheap and each
/// invocation carries its own collaborator handles.
#[derive(Clone)]
pub struct FirebaseAuthBridge {
    plugin: Arc<dyn NativeAuthPlugin>,
    backend: Arc<dyn AuthBackend>,
    phone_events: Arc<PhoneVerificationEvents>,
}

impl FirebaseAuthBridge {
    pub fn new(plugin: Arc<dyn NativeAuthPlugin>, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            plugin,
            backend,
            phone_events: Arc::new(PhoneVerificationEvents::new()),
        }
    }

    /// Builds a bridge over the plugin installed in the global
    /// [`PluginRegistry`]; fails when the composing application has not
    /// registered one yet.
    pub fn from_registry(backend: Arc<dyn AuthBackend>) -> AuthResult<Self> {
        let plugin = PluginRegistry::global().require()?;
        Ok(Self::new(plugin, backend))
    }

    /// The hub the native layer feeds phone verification notifications into.
    pub fn phone_events(&self) -> Arc<PhoneVerificationEvents> {
        self.phone_events.clone()
    }

    /// Dispatches a request to its provider flow and returns the session
    /// paired with the raw native result.
    ///
    /// `Ok(None)` occurs only on the phone path, when the SMS was dispatched
    /// but no verification code is available yet.
    pub async fn sign_in_with_result(
        &self,
        request: SignInRequest,
    ) -> AuthResult<Option<SignInOutcome>> {
        match request {
            SignInRequest::Google(options) => {
                self.sign_in_google_with_result(options).await.map(Some)
            }
            SignInRequest::Facebook(data) => {
                self.sign_in_facebook_with_result(data).await.map(Some)
            }
            SignInRequest::Twitter(data) => self.sign_in_twitter_with_result(data).await.map(Some),
            SignInRequest::Apple(data) => self.sign_in_apple_with_result(data).await.map(Some),
            SignInRequest::Phone(options) => self.sign_in_phone_with_result(options).await,
        }
    }

    /// Dispatches a request to its provider flow, returning the bare session.
    pub async fn sign_in(&self, request: SignInRequest) -> AuthResult<Option<UserCredential>> {
        let outcome = self.sign_in_with_result(request).await?;
        Ok(outcome.map(|outcome| outcome.user_credential))
    }

    /// String-tagged dispatch entry point.
    ///
    /// The tag is validated before anything else; an unrecognized tag fails
    /// with `UnsupportedProvider` and no native call is made.
    pub async fn sign_in_with_provider_id(
        &self,
        provider_id: &str,
        data: Value,
    ) -> AuthResult<Option<UserCredential>> {
        let request = SignInRequest::from_parts(provider_id, data)?;
        self.sign_in(request).await
    }

    pub async fn sign_in_google_with_result(
        &self,
        options: GoogleSignInOptions,
    ) -> AuthResult<SignInOutcome> {
        let request = SignInRequest::Google(options);
        let native = self.plugin.sign_in(GOOGLE_PROVIDER_ID, &request).await?;
        self.exchange(native).await
    }

    pub async fn sign_in_google(&self, options: GoogleSignInOptions) -> AuthResult<UserCredential> {
        let outcome = self.sign_in_google_with_result(options).await?;
        Ok(outcome.user_credential)
    }

    pub async fn sign_in_facebook_with_result(
        &self,
        data: ProviderData,
    ) -> AuthResult<SignInOutcome> {
        let request = SignInRequest::Facebook(data);
        let native = self.plugin.sign_in(FACEBOOK_PROVIDER_ID, &request).await?;
        self.exchange(native).await
    }

    pub async fn sign_in_facebook(&self, data: ProviderData) -> AuthResult<UserCredential> {
        let outcome = self.sign_in_facebook_with_result(data).await?;
        Ok(outcome.user_credential)
    }

    pub async fn sign_in_twitter_with_result(
        &self,
        data: ProviderData,
    ) -> AuthResult<SignInOutcome> {
        let request = SignInRequest::Twitter(data);
        let native = self.plugin.sign_in(TWITTER_PROVIDER_ID, &request).await?;
        self.exchange(native).await
    }

    pub async fn sign_in_twitter(&self, data: ProviderData) -> AuthResult<UserCredential> {
        let outcome = self.sign_in_twitter_with_result(data).await?;
        Ok(outcome.user_credential)
    }

    /// The native call is always issued with the fixed `apple.com` identifier,
    /// never with a value taken from the request data.
    pub async fn sign_in_apple_with_result(&self, data: ProviderData) -> AuthResult<SignInOutcome> {
        let request = SignInRequest::Apple(data);
        let native = self.plugin.sign_in(APPLE_PROVIDER_ID, &request).await?;
        self.exchange(native).await
    }

    pub async fn sign_in_apple(&self, data: ProviderData) -> AuthResult<UserCredential> {
        let outcome = self.sign_in_apple_with_result(data).await?;
        Ok(outcome.user_credential)
    }

    /// Phone sign-in handles code dispatch and code entry in one entry point.
    ///
    /// A native result without a verification code means the SMS was just
    /// sent: the flow completes with `Ok(None)` and the caller waits for the
    /// code through [`PhoneVerificationEvents`] or a second request carrying
    /// the code the user typed in.
    pub async fn sign_in_phone_with_result(
        &self,
        options: PhoneSignInOptions,
    ) -> AuthResult<Option<SignInOutcome>> {
        let request = SignInRequest::Phone(options);
        let native = self.plugin.sign_in(PHONE_PROVIDER_ID, &request).await?;
        match &native {
            NativeSignInResult::Phone(result) if result.verification_code.is_none() => {
                log::debug!(
                    "phone sign-in pending verification code (id {})",
                    result.verification_id
                );
                Ok(None)
            }
            _ => self.exchange(native).await.map(Some),
        }
    }

    pub async fn sign_in_phone(
        &self,
        options: PhoneSignInOptions,
    ) -> AuthResult<Option<UserCredential>> {
        let outcome = self.sign_in_phone_with_result(options).await?;
        Ok(outcome.map(|outcome| outcome.user_credential))
    }

    /// Signs out of the native layer first, then terminates the backend
    /// session. Completion is reported only after both succeed.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.plugin.sign_out().await?;
        self.backend.sign_out().await
    }

    /// Observable variant of [`sign_in`](Self::sign_in): delivers the outcome
    /// to the observer through a single-emission subscription. The returned
    /// future drives the flow; the caller spawns it on the platform's task
    /// queue.
    pub fn sign_in_observable(
        &self,
        request: SignInRequest,
        observer: PartialObserver<UserCredential>,
    ) -> (SignInSubscription, impl Future<Output = ()> + Send + 'static) {
        let bridge = self.clone();
        subscribe_single(async move { bridge.sign_in(request).await }, observer)
    }

    /// Observable variant of [`sign_in_with_result`](Self::sign_in_with_result).
    pub fn sign_in_with_result_observable(
        &self,
        request: SignInRequest,
        observer: PartialObserver<SignInOutcome>,
    ) -> (SignInSubscription, impl Future<Output = ()> + Send + 'static) {
        let bridge = self.clone();
        subscribe_single(
            async move { bridge.sign_in_with_result(request).await },
            observer,
        )
    }

    /// Observable variant of [`sign_out`](Self::sign_out); emits a bare
    /// completion on success.
    pub fn sign_out_observable(
        &self,
        observer: PartialObserver<()>,
    ) -> (SignInSubscription, impl Future<Output = ()> + Send + 'static) {
        let bridge = self.clone();
        subscribe_single(
            async move { bridge.sign_out().await.map(|()| None) },
            observer,
        )
    }

    // Stage 2 of every flow: build the provider credential from the raw
    // tokens and exchange it for a session. The native result is consumed
    // exactly once and returned alongside the session.
    async fn exchange(&self, native: NativeSignInResult) -> AuthResult<SignInOutcome> {
        let credential = AuthCredential::try_from_native(&native)?;
        let user_credential = self.backend.sign_in_with_credential(credential).await?;
        Ok(SignInOutcome {
            user_credential,
            native_result: native,
        })
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::credential::OAuthProvider;
use crate::error::{AuthBridgeError, AuthResult};
use crate::model::{
    AppleSignInResult, FacebookSignInResult, GoogleSignInResult, NativeSignInResult,
    PhoneSignInOptions, PhoneSignInResult, SignInRequest, TwitterSignInResult,
};
use crate::plugin::{NativeAuthPlugin, PluginRegistry};
use crate::provider::{FACEBOOK_PROVIDER_ID, GOOGLE_PROVIDER_ID, TWITTER_PROVIDER_ID};

/// Raw tokens a popup-based web sign-in produced.
///
/// Which fields are present depends on the provider; the plugin validates the
/// combination its provider rule needs.
#[derive(Clone, Debug, Default)]
pub struct PopupTokens {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub secret: Option<String>,
    pub raw_nonce: Option<String>,
}

/// Opens the provider's sign-in popup and returns the tokens it yielded.
pub trait WebPopupHandler: Send + Sync {
    fn open_popup(&self, provider: &OAuthProvider) -> AuthResult<PopupTokens>;
}

/// Runs phone number verification on the web platform.
#[async_trait]
pub trait WebPhoneVerifier: Send + Sync {
    async fn verify(&self, options: &PhoneSignInOptions) -> AuthResult<PhoneSignInResult>;
}

/// Web-platform implementation of [`NativeAuthPlugin`].
///
/// Routes each request through the same closed provider match as the bridge
/// and delegates the user-facing part to the popup handler (OAuth providers)
/// or the phone verifier.
pub struct WebFirebaseAuthPlugin {
    popup: Arc<dyn WebPopupHandler>,
    phone: Arc<dyn WebPhoneVerifier>,
}

impl WebFirebaseAuthPlugin {
    pub fn new(popup: Arc<dyn WebPopupHandler>, phone: Arc<dyn WebPhoneVerifier>) -> Self {
        Self { popup, phone }
    }
}

/// Installs a web plugin into the global registry.
///
/// This is an explicit initialization step the composing application performs
/// once at startup; nothing registers itself implicitly.
pub fn register_web_plugin(
    popup: Arc<dyn WebPopupHandler>,
    phone: Arc<dyn WebPhoneVerifier>,
) -> Arc<WebFirebaseAuthPlugin> {
    let plugin = Arc::new(WebFirebaseAuthPlugin::new(popup, phone));
    PluginRegistry::global().register(plugin.clone());
    plugin
}

#[async_trait]
impl NativeAuthPlugin for WebFirebaseAuthPlugin {
    async fn sign_in(
        &self,
        provider_id: &str,
        request: &SignInRequest,
    ) -> AuthResult<NativeSignInResult> {
        if provider_id != request.provider().id() {
            log::debug!(
                "provider id '{provider_id}' does not match request tag '{}'",
                request.provider()
            );
        }

        match request {
            SignInRequest::Google(options) => {
                let mut provider = OAuthProvider::new(GOOGLE_PROVIDER_ID);
                for scope in &options.scopes {
                    provider.add_scope(scope.clone());
                }
                let tokens = self.popup.open_popup(&provider)?;
                Ok(NativeSignInResult::Google(GoogleSignInResult {
                    id_token: require_token(tokens.id_token, "idToken")?,
                    access_token: require_token(tokens.access_token, "accessToken")?,
                }))
            }
            SignInRequest::Facebook(_) => {
                let provider = OAuthProvider::new(FACEBOOK_PROVIDER_ID);
                let tokens = self.popup.open_popup(&provider)?;
                Ok(NativeSignInResult::Facebook(FacebookSignInResult {
                    id_token: require_token(tokens.id_token, "idToken")?,
                }))
            }
            SignInRequest::Twitter(_) => {
                let provider = OAuthProvider::new(TWITTER_PROVIDER_ID);
                let tokens = self.popup.open_popup(&provider)?;
                Ok(NativeSignInResult::Twitter(TwitterSignInResult {
                    id_token: require_token(tokens.id_token, "idToken")?,
                    secret: require_token(tokens.secret, "secret")?,
                }))
            }
            SignInRequest::Apple(_) => {
                let provider = OAuthProvider::apple();
                let tokens = self.popup.open_popup(&provider)?;
                Ok(NativeSignInResult::Apple(AppleSignInResult {
                    id_token: require_token(tokens.id_token, "idToken")?,
                    raw_nonce: require_token(tokens.raw_nonce, "rawNonce")?,
                }))
            }
            SignInRequest::Phone(options) => {
                self.phone.verify(options).await.map(NativeSignInResult::Phone)
            }
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        // No platform session of its own; the backend sign-out is the
        // bridge's second stage.
        log::debug!("web plugin sign-out");
        Ok(())
    }
}

fn require_token(token: Option<String>, field: &'static str) -> AuthResult<String> {
    token.ok_or_else(|| {
        AuthBridgeError::InvalidCredential(format!("web popup result missing {field}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoogleSignInOptions;
    use futures::executor::block_on;
    use std::sync::Mutex;

    struct StubPopup {
        tokens: PopupTokens,
        seen: Mutex<Vec<OAuthProvider>>,
    }

    impl StubPopup {
        fn with_tokens(tokens: PopupTokens) -> Arc<Self> {
            Arc::new(Self {
                tokens,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl WebPopupHandler for StubPopup {
        fn open_popup(&self, provider: &OAuthProvider) -> AuthResult<PopupTokens> {
            self.seen.lock().unwrap().push(provider.clone());
            Ok(self.tokens.clone())
        }
    }

    struct StubVerifier;

    #[async_trait]
    impl WebPhoneVerifier for StubVerifier {
        async fn verify(&self, options: &PhoneSignInOptions) -> AuthResult<PhoneSignInResult> {
            Ok(PhoneSignInResult {
                verification_id: format!("verify-{}", options.phone),
                verification_code: options.verification_code.clone(),
            })
        }
    }

    fn web_plugin(popup: Arc<StubPopup>) -> WebFirebaseAuthPlugin {
        WebFirebaseAuthPlugin::new(popup, Arc::new(StubVerifier))
    }

    #[test]
    fn google_popup_applies_requested_scopes() {
        let popup = StubPopup::with_tokens(PopupTokens {
            id_token: Some("T1".into()),
            access_token: Some("A1".into()),
            ..Default::default()
        });
        let plugin = web_plugin(popup.clone());

        let request = SignInRequest::Google(GoogleSignInOptions {
            scopes: vec!["email".into(), "profile".into()],
        });
        let result = block_on(plugin.sign_in("google.com", &request)).unwrap();

        assert_eq!(
            result,
            NativeSignInResult::Google(GoogleSignInResult {
                id_token: "T1".into(),
                access_token: "A1".into(),
            })
        );
        let seen = popup.seen.lock().unwrap();
        assert_eq!(seen[0].provider_id(), "google.com");
        assert_eq!(seen[0].scopes(), ["email", "profile"]);
    }

    #[test]
    fn google_without_access_token_is_invalid() {
        let popup = StubPopup::with_tokens(PopupTokens {
            id_token: Some("T1".into()),
            ..Default::default()
        });
        let plugin = web_plugin(popup);

        let request = SignInRequest::Google(GoogleSignInOptions::default());
        let err = block_on(plugin.sign_in("google.com", &request)).unwrap_err();
        assert!(matches!(err, AuthBridgeError::InvalidCredential(_)));
    }

    #[test]
    fn apple_popup_uses_predeclared_provider() {
        let popup = StubPopup::with_tokens(PopupTokens {
            id_token: Some("T1".into()),
            raw_nonce: Some("N1".into()),
            ..Default::default()
        });
        let plugin = web_plugin(popup.clone());

        let request = SignInRequest::Apple(Default::default());
        block_on(plugin.sign_in("apple.com", &request)).unwrap();

        let seen = popup.seen.lock().unwrap();
        assert_eq!(seen[0].provider_id(), "apple.com");
        assert_eq!(seen[0].scopes(), ["email", "name"]);
    }

    #[test]
    fn phone_delegates_to_verifier() {
        let popup = StubPopup::with_tokens(PopupTokens::default());
        let plugin = web_plugin(popup);

        let request = SignInRequest::Phone(PhoneSignInOptions {
            phone: "+15551234567".into(),
            verification_code: None,
        });
        let result = block_on(plugin.sign_in("phone", &request)).unwrap();
        match result {
            NativeSignInResult::Phone(result) => {
                assert_eq!(result.verification_id, "verify-+15551234567");
                assert!(result.verification_code.is_none());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

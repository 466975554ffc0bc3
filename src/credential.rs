use crate::error::{AuthBridgeError, AuthResult};
use crate::model::NativeSignInResult;
use crate::provider::{Provider, APPLE_PROVIDER_ID};

/// Builder-like representation of an OAuth identity provider.
///
/// A pared-down sibling of the full SDK provider object: it only declares the
/// provider ID and the scopes attached to credentials it mints, which is all
/// the bridge needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthProvider {
    provider_id: String,
    scopes: Vec<String>,
}

impl OAuthProvider {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            scopes: Vec::new(),
        }
    }

    /// The provider object used for Apple credential construction, pre-declared
    /// with the `email` and `name` scopes.
    pub fn apple() -> Self {
        let mut provider = Self::new(APPLE_PROVIDER_ID);
        provider.add_scope("email");
        provider.add_scope("name");
        provider
    }

    /// Returns the provider identifier (e.g. `apple.com`).
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Returns the configured OAuth scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Adds a scope to the provider if it has not been added yet.
    pub fn add_scope(&mut self, scope: impl Into<String>) {
        let value = scope.into();
        if !self.scopes.contains(&value) {
            self.scopes.push(value);
        }
    }

    /// Mints an OAuth credential carrying this provider's declared scopes.
    pub fn credential(
        &self,
        id_token: impl Into<String>,
        raw_nonce: impl Into<String>,
    ) -> AuthCredential {
        AuthCredential::Apple {
            id_token: id_token.into(),
            raw_nonce: raw_nonce.into(),
            scopes: self.scopes.clone(),
        }
    }
}

/// A backend credential ready for the session exchange.
///
/// Instances are built through the per-provider constructors only; each
/// variant carries exactly the raw token fields its provider's construction
/// rule requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthCredential {
    Google {
        id_token: String,
        access_token: String,
    },
    Facebook {
        id_token: String,
    },
    Twitter {
        id_token: String,
        secret: String,
    },
    Apple {
        id_token: String,
        raw_nonce: String,
        scopes: Vec<String>,
    },
    Phone {
        verification_id: String,
        verification_code: String,
    },
}

impl AuthCredential {
    pub fn google(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
        AuthCredential::Google {
            id_token: id_token.into(),
            access_token: access_token.into(),
        }
    }

    pub fn facebook(id_token: impl Into<String>) -> Self {
        AuthCredential::Facebook {
            id_token: id_token.into(),
        }
    }

    pub fn twitter(id_token: impl Into<String>, secret: impl Into<String>) -> Self {
        AuthCredential::Twitter {
            id_token: id_token.into(),
            secret: secret.into(),
        }
    }

    /// Builds the Apple credential via the pre-declared OAuth provider object.
    pub fn apple(id_token: impl Into<String>, raw_nonce: impl Into<String>) -> Self {
        OAuthProvider::apple().credential(id_token, raw_nonce)
    }

    pub fn phone(
        verification_id: impl Into<String>,
        verification_code: impl Into<String>,
    ) -> Self {
        AuthCredential::Phone {
            verification_id: verification_id.into(),
            verification_code: verification_code.into(),
        }
    }

    /// Returns the provider this credential belongs to.
    pub fn provider(&self) -> Provider {
        match self {
            AuthCredential::Google { .. } => Provider::Google,
            AuthCredential::Facebook { .. } => Provider::Facebook,
            AuthCredential::Twitter { .. } => Provider::Twitter,
            AuthCredential::Apple { .. } => Provider::Apple,
            AuthCredential::Phone { .. } => Provider::Phone,
        }
    }

    /// Applies the per-provider construction rule to a native result.
    ///
    /// A phone result without a verification code is not representable as a
    /// credential; callers decide the empty-completion case before getting
    /// here.
    pub fn try_from_native(result: &NativeSignInResult) -> AuthResult<Self> {
        match result {
            NativeSignInResult::Google(result) => {
                Ok(Self::google(&result.id_token, &result.access_token))
            }
            NativeSignInResult::Facebook(result) => Ok(Self::facebook(&result.id_token)),
            NativeSignInResult::Twitter(result) => {
                Ok(Self::twitter(&result.id_token, &result.secret))
            }
            NativeSignInResult::Apple(result) => {
                Ok(Self::apple(&result.id_token, &result.raw_nonce))
            }
            NativeSignInResult::Phone(result) => match &result.verification_code {
                Some(code) => Ok(Self::phone(&result.verification_id, code)),
                None => Err(AuthBridgeError::InvalidCredential(
                    "phone verification code has not been received".into(),
                )),
            },
        }
    }
}

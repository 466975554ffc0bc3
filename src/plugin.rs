use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::error::{AuthBridgeError, AuthResult};
use crate::model::{NativeSignInResult, SignInRequest, UserCredential};
use crate::credential::AuthCredential;

/// The platform-specific sign-in capability.
///
/// Implementations perform the actual user-facing authentication flow (native
/// SDK, popup, ...) and return the raw tokens for the requested provider. The
/// bridge never looks inside how this happens.
#[async_trait]
pub trait NativeAuthPlugin: Send + Sync {
    /// Runs the native sign-in flow for `provider_id` and returns its raw
    /// tokens. The result's variant must match the requested provider.
    async fn sign_in(
        &self,
        provider_id: &str,
        request: &SignInRequest,
    ) -> AuthResult<NativeSignInResult>;

    /// Signs the user out of the native layer.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// The identity backend's SDK surface the bridge exchanges credentials with.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchanges a provider credential for a session.
    async fn sign_in_with_credential(
        &self,
        credential: AuthCredential,
    ) -> AuthResult<UserCredential>;

    /// Terminates the backend session.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// Holds the native plugin implementation for the running application.
///
/// Registration is an explicit call made once during application
/// initialization, owned by the composing application; nothing registers
/// itself as a side effect of being linked in.
pub struct PluginRegistry {
    plugin: Mutex<Option<Arc<dyn NativeAuthPlugin>>>,
}

static GLOBAL_REGISTRY: Lazy<PluginRegistry> = Lazy::new(PluginRegistry::new);

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugin: Mutex::new(None),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static PluginRegistry {
        &GLOBAL_REGISTRY
    }

    /// Installs the native plugin implementation, replacing any previous one.
    pub fn register(&self, plugin: Arc<dyn NativeAuthPlugin>) {
        *self.plugin.lock().unwrap() = Some(plugin);
        log::debug!("native auth plugin registered");
    }

    /// Returns the registered plugin, if any.
    pub fn registered(&self) -> Option<Arc<dyn NativeAuthPlugin>> {
        self.plugin.lock().unwrap().clone()
    }

    /// Returns the registered plugin or fails when none was installed.
    pub fn require(&self) -> AuthResult<Arc<dyn NativeAuthPlugin>> {
        self.registered()
            .ok_or(AuthBridgeError::NotImplemented("native auth plugin not registered"))
    }

    /// Removes the registered plugin.
    pub fn clear(&self) {
        *self.plugin.lock().unwrap() = None;
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

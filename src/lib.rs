#![doc = include_str!("RUSTDOC.md")]

mod bridge;
mod credential;
mod error;
mod model;
mod observe;
mod phone;
mod plugin;
mod provider;
mod web;

#[doc(inline)]
pub use bridge::FirebaseAuthBridge;

#[doc(inline)]
pub use credential::{AuthCredential, OAuthProvider};

#[doc(inline)]
pub use error::{AuthBridgeError, AuthResult};

#[doc(inline)]
pub use model::{
    AppleSignInResult, FacebookSignInResult, GoogleSignInOptions, GoogleSignInResult,
    NativeSignInResult, PhoneCodeReceivedEvent, PhoneCodeSentEvent, PhoneSignInOptions,
    PhoneSignInResult, ProviderData, SignInOutcome, SignInRequest, TwitterSignInResult,
    UserCredential,
};

#[doc(inline)]
pub use observe::{
    subscribe_single, CompleteFn, ErrorFn, NextFn, PartialObserver, SignInSubscription,
};

#[doc(inline)]
pub use phone::{OneShotSubscription, PhoneVerificationEvents};

#[doc(inline)]
pub use plugin::{AuthBackend, NativeAuthPlugin, PluginRegistry};

#[doc(inline)]
pub use provider::{
    Provider, APPLE_PROVIDER_ID, FACEBOOK_PROVIDER_ID, GOOGLE_PROVIDER_ID, PHONE_PROVIDER_ID,
    TWITTER_PROVIDER_ID,
};

#[doc(inline)]
pub use web::{
    register_web_plugin, PopupTokens, WebFirebaseAuthPlugin, WebPhoneVerifier, WebPopupHandler,
};

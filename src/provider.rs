use std::fmt;
use std::str::FromStr;

use crate::error::AuthBridgeError;

/// Provider ID for Google sign-in.
pub const GOOGLE_PROVIDER_ID: &str = "google.com";
/// Provider ID for Facebook sign-in.
pub const FACEBOOK_PROVIDER_ID: &str = "facebook.com";
/// Provider ID for Twitter sign-in.
pub const TWITTER_PROVIDER_ID: &str = "twitter.com";
/// Provider ID for Apple sign-in. The native layer is always invoked with this
/// constant, never with a value taken from request data.
pub const APPLE_PROVIDER_ID: &str = "apple.com";
/// Provider ID for phone number authentication.
pub const PHONE_PROVIDER_ID: &str = "phone";

/// The closed set of identity providers the bridge can route to.
///
/// Sign-in requests are dispatched by matching exhaustively over this enum;
/// there is no string fallthrough. Tags outside the five canonical IDs fail
/// at parse time with [`AuthBridgeError::UnsupportedProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    Facebook,
    Twitter,
    Apple,
    Phone,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Google,
        Provider::Facebook,
        Provider::Twitter,
        Provider::Apple,
        Provider::Phone,
    ];

    /// Returns the canonical provider identifier (e.g. `google.com`).
    pub fn id(self) -> &'static str {
        match self {
            Provider::Google => GOOGLE_PROVIDER_ID,
            Provider::Facebook => FACEBOOK_PROVIDER_ID,
            Provider::Twitter => TWITTER_PROVIDER_ID,
            Provider::Apple => APPLE_PROVIDER_ID,
            Provider::Phone => PHONE_PROVIDER_ID,
        }
    }
}

impl FromStr for Provider {
    type Err = AuthBridgeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            GOOGLE_PROVIDER_ID => Ok(Provider::Google),
            FACEBOOK_PROVIDER_ID => Ok(Provider::Facebook),
            TWITTER_PROVIDER_ID => Ok(Provider::Twitter),
            APPLE_PROVIDER_ID => Ok(Provider::Apple),
            PHONE_PROVIDER_ID => Ok(Provider::Phone),
            other => Err(AuthBridgeError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

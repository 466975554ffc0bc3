use std::fmt;

pub type AuthResult<T> = Result<T, AuthBridgeError>;

#[derive(Debug, Clone)]
pub enum AuthBridgeError {
    /// The request's provider tag matched none of the five supported providers.
    UnsupportedProvider(String),
    /// The native sign-in capability rejected the call.
    Native(String),
    /// The identity backend rejected the credential exchange or sign-out.
    Backend(String),
    InvalidCredential(String),
    NotImplemented(&'static str),
}

impl fmt::Display for AuthBridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthBridgeError::UnsupportedProvider(tag) => {
                write!(f, "The '{tag}' provider was not supported")
            }
            AuthBridgeError::Native(message) => write!(f, "Native sign-in error: {message}"),
            AuthBridgeError::Backend(message) => write!(f, "Backend error: {message}"),
            AuthBridgeError::InvalidCredential(message) => {
                write!(f, "Invalid credential: {message}")
            }
            AuthBridgeError::NotImplemented(feature) => write!(f, "{feature} is not implemented"),
        }
    }
}

impl std::error::Error for AuthBridgeError {}

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AuthBridgeError, AuthResult};
use crate::provider::Provider;

/// Free-form provider payload for providers that take no structured options.
pub type ProviderData = Map<String, Value>;

/// Options for a Google sign-in request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInOptions {
    /// OAuth scopes requested from Google in addition to the defaults.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Options for a phone number sign-in request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignInOptions {
    /// The user phone number, in E.164 form.
    pub phone: String,
    /// The SMS verification code, when the user already received one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

/// A sign-in request, discriminated by provider.
///
/// The JSON wire shape carries the provider tag in a `providerId` field next
/// to the provider-specific payload, which is how the native layer receives
/// it. Unknown tags fail at [`SignInRequest::from_parts`] time, before any
/// native call is made.
#[derive(Clone, Debug, PartialEq)]
pub enum SignInRequest {
    Google(GoogleSignInOptions),
    Facebook(ProviderData),
    Twitter(ProviderData),
    Apple(ProviderData),
    Phone(PhoneSignInOptions),
}

impl SignInRequest {
    /// Returns the provider this request is addressed to.
    pub fn provider(&self) -> Provider {
        match self {
            SignInRequest::Google(_) => Provider::Google,
            SignInRequest::Facebook(_) => Provider::Facebook,
            SignInRequest::Twitter(_) => Provider::Twitter,
            SignInRequest::Apple(_) => Provider::Apple,
            SignInRequest::Phone(_) => Provider::Phone,
        }
    }

    /// Builds a request from a raw provider tag and its JSON payload.
    ///
    /// This is the string-tagged entry point: an unrecognized tag is a
    /// terminal [`AuthBridgeError::UnsupportedProvider`], never a default
    /// route.
    pub fn from_parts(provider_id: &str, data: Value) -> AuthResult<Self> {
        let provider: Provider = provider_id.parse()?;
        let data = Value::Object(into_data_bag(data)?);
        match provider {
            Provider::Google => {
                let options = from_payload::<GoogleSignInOptions>(data)?;
                Ok(SignInRequest::Google(options))
            }
            Provider::Facebook => Ok(SignInRequest::Facebook(into_data_bag(data)?)),
            Provider::Twitter => Ok(SignInRequest::Twitter(into_data_bag(data)?)),
            Provider::Apple => Ok(SignInRequest::Apple(into_data_bag(data)?)),
            Provider::Phone => {
                let options = from_payload::<PhoneSignInOptions>(data)?;
                Ok(SignInRequest::Phone(options))
            }
        }
    }

    /// Reconstructs a request from a JSON value previously produced via
    /// [`to_json`](Self::to_json).
    pub fn from_json(value: Value) -> AuthResult<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(AuthBridgeError::InvalidCredential(
                    "sign-in request must be a JSON object".into(),
                ))
            }
        };
        let provider_id = map
            .remove("providerId")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                AuthBridgeError::InvalidCredential("sign-in request missing providerId".into())
            })?;
        Self::from_parts(&provider_id, Value::Object(map))
    }

    /// Serializes the request to the tagged JSON shape the native layer expects.
    pub fn to_json(&self) -> AuthResult<Value> {
        let (provider, payload) = match self {
            SignInRequest::Google(options) => (Provider::Google, to_payload(options)?),
            SignInRequest::Facebook(data) => (Provider::Facebook, data.clone()),
            SignInRequest::Twitter(data) => (Provider::Twitter, data.clone()),
            SignInRequest::Apple(data) => (Provider::Apple, data.clone()),
            SignInRequest::Phone(options) => (Provider::Phone, to_payload(options)?),
        };
        let mut map = payload;
        map.insert("providerId".to_string(), json!(provider.id()));
        Ok(Value::Object(map))
    }
}

/// Raw tokens produced by a Google native sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInResult {
    pub id_token: String,
    pub access_token: String,
}

/// Raw tokens produced by a Facebook native sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookSignInResult {
    pub id_token: String,
}

/// Raw tokens produced by a Twitter native sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSignInResult {
    pub id_token: String,
    pub secret: String,
}

/// Raw tokens produced by an Apple native sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleSignInResult {
    pub id_token: String,
    pub raw_nonce: String,
}

/// Result of a phone native sign-in.
///
/// A missing `verification_code` means the SMS was just dispatched; the flow
/// then completes without a credential exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignInResult {
    pub verification_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

/// The raw result of a native sign-in call, discriminated by provider.
///
/// Created once per native call, consumed once to build an
/// [`AuthCredential`](crate::credential::AuthCredential), then discarded.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeSignInResult {
    Google(GoogleSignInResult),
    Facebook(FacebookSignInResult),
    Twitter(TwitterSignInResult),
    Apple(AppleSignInResult),
    Phone(PhoneSignInResult),
}

impl NativeSignInResult {
    /// Returns the provider that produced this result.
    pub fn provider(&self) -> Provider {
        match self {
            NativeSignInResult::Google(_) => Provider::Google,
            NativeSignInResult::Facebook(_) => Provider::Facebook,
            NativeSignInResult::Twitter(_) => Provider::Twitter,
            NativeSignInResult::Apple(_) => Provider::Apple,
            NativeSignInResult::Phone(_) => Provider::Phone,
        }
    }

    /// Reconstructs a native result from its tagged JSON shape.
    pub fn from_json(value: Value) -> AuthResult<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(AuthBridgeError::InvalidCredential(
                    "native sign-in result must be a JSON object".into(),
                ))
            }
        };
        let provider_id = map
            .remove("providerId")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                AuthBridgeError::InvalidCredential("native sign-in result missing providerId".into())
            })?;
        let provider: Provider = provider_id.parse()?;
        let payload = Value::Object(map);
        match provider {
            Provider::Google => Ok(NativeSignInResult::Google(from_payload(payload)?)),
            Provider::Facebook => Ok(NativeSignInResult::Facebook(from_payload(payload)?)),
            Provider::Twitter => Ok(NativeSignInResult::Twitter(from_payload(payload)?)),
            Provider::Apple => Ok(NativeSignInResult::Apple(from_payload(payload)?)),
            Provider::Phone => Ok(NativeSignInResult::Phone(from_payload(payload)?)),
        }
    }

    /// Serializes the native result to its tagged JSON shape.
    pub fn to_json(&self) -> AuthResult<Value> {
        let (provider, payload) = match self {
            NativeSignInResult::Google(result) => (Provider::Google, to_payload(result)?),
            NativeSignInResult::Facebook(result) => (Provider::Facebook, to_payload(result)?),
            NativeSignInResult::Twitter(result) => (Provider::Twitter, to_payload(result)?),
            NativeSignInResult::Apple(result) => (Provider::Apple, to_payload(result)?),
            NativeSignInResult::Phone(result) => (Provider::Phone, to_payload(result)?),
        };
        let mut map = payload;
        map.insert("providerId".to_string(), json!(provider.id()));
        Ok(Value::Object(map))
    }
}

/// The identity backend's authenticated-user result.
///
/// The bridge never stores this; it is forwarded to the caller as the single
/// success emission of a sign-in flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredential {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_new_user: bool,
}

/// A backend session paired with the raw native result it was exchanged from.
///
/// Some callers need provider-specific fields (for instance Facebook's access
/// token) that the session object does not carry; the `*_with_result` entry
/// points return this pairing instead of the bare session.
#[derive(Clone, Debug, PartialEq)]
pub struct SignInOutcome {
    pub user_credential: UserCredential,
    pub native_result: NativeSignInResult,
}

/// Payload of the one-shot `code sent` phone verification event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCodeSentEvent {
    pub verification_id: String,
}

/// Payload of the one-shot `code received` phone verification event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCodeReceivedEvent {
    pub verification_id: String,
    pub verification_code: String,
}

fn from_payload<T: serde::de::DeserializeOwned>(value: Value) -> AuthResult<T> {
    serde_json::from_value(value).map_err(|err| AuthBridgeError::InvalidCredential(err.to_string()))
}

fn to_payload<T: Serialize>(value: &T) -> AuthResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AuthBridgeError::InvalidCredential(
            "payload did not serialize to an object".into(),
        )),
        Err(err) => Err(AuthBridgeError::InvalidCredential(err.to_string())),
    }
}

fn into_data_bag(value: Value) -> AuthResult<ProviderData> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ProviderData::new()),
        _ => Err(AuthBridgeError::InvalidCredential(
            "provider data must be a JSON object".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_request_from_parts_keeps_scopes() {
        let request =
            SignInRequest::from_parts("google.com", json!({ "scopes": ["email"] })).unwrap();
        match &request {
            SignInRequest::Google(options) => assert_eq!(options.scopes, vec!["email"]),
            other => panic!("unexpected request: {other:?}"),
        }
        assert_eq!(request.provider(), Provider::Google);
    }

    #[test]
    fn unknown_tag_fails_before_any_routing() {
        let err = SignInRequest::from_parts("github.com", Value::Null).unwrap_err();
        assert!(matches!(err, AuthBridgeError::UnsupportedProvider(tag) if tag == "github.com"));
    }

    #[test]
    fn phone_request_json_round_trip() {
        let request = SignInRequest::Phone(PhoneSignInOptions {
            phone: "+15551234567".into(),
            verification_code: Some("123456".into()),
        });
        let value = request.to_json().unwrap();
        assert_eq!(value["providerId"], json!("phone"));
        assert_eq!(value["verificationCode"], json!("123456"));
        assert_eq!(SignInRequest::from_json(value).unwrap(), request);
    }

    #[test]
    fn facebook_request_accepts_free_form_data() {
        let request =
            SignInRequest::from_parts("facebook.com", json!({ "rerequest": true })).unwrap();
        match &request {
            SignInRequest::Facebook(data) => assert_eq!(data.get("rerequest"), Some(&json!(true))),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn native_result_json_uses_camel_case_tokens() {
        let result = NativeSignInResult::Google(GoogleSignInResult {
            id_token: "T1".into(),
            access_token: "A1".into(),
        });
        let value = result.to_json().unwrap();
        assert_eq!(value["providerId"], json!("google.com"));
        assert_eq!(value["idToken"], json!("T1"));
        assert_eq!(value["accessToken"], json!("A1"));
        assert_eq!(NativeSignInResult::from_json(value).unwrap(), result);
    }

    #[test]
    fn phone_result_without_code_round_trips() {
        let result = NativeSignInResult::Phone(PhoneSignInResult {
            verification_id: "V1".into(),
            verification_code: None,
        });
        let value = result.to_json().unwrap();
        assert!(value.get("verificationCode").is_none());
        assert_eq!(NativeSignInResult::from_json(value).unwrap(), result);
    }

    #[test]
    fn request_from_json_requires_provider_tag() {
        let err = SignInRequest::from_json(json!({ "scopes": ["email"] })).unwrap_err();
        assert!(matches!(err, AuthBridgeError::InvalidCredential(_)));
    }
}

use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use std::fmt;

#[derive(Clone, Default, Eq, PartialEq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Value placed in the `Authorization` header of outbound requests.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Auth {
    /// Jenkins API token as HTTP Basic credentials.
    Basic { user: String, token: SecretString },
    /// Token sent verbatim, without a scheme (what `webhook-step` expects).
    Raw { token: SecretString },
}

impl Auth {
    #[must_use]
    pub fn basic(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            token: SecretString::new(token),
        }
    }

    #[must_use]
    pub fn raw(token: impl Into<String>) -> Self {
        Self::Raw {
            token: SecretString::new(token),
        }
    }

    pub(crate) fn secrets(&self) -> Vec<&str> {
        match self {
            Self::Basic { token, .. } => vec![token.expose()],
            Self::Raw { token } => vec![token.expose()],
        }
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        let raw = match self {
            Self::Basic { user, token } => {
                format!("Basic {}", B64.encode(format!("{user}:{}", token.expose())))
            }
            Self::Raw { token } => token.expose().to_owned(),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|err| Error::InvalidConfig {
            message: "invalid Authorization header value".into(),
            source: Some(Box::new(err)),
        })?;
        value.set_sensitive(true);

        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

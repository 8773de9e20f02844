//! Admin gate for mutating requests.
//!
//! Every create, update and delete must present the admin credential before
//! the store is touched. Reads are open. The check sits behind [`AdminGate`]
//! so a different scheme can be swapped in without changing handlers.

use crate::error::ApiError;

/// Decides whether a supplied credential may mutate the directory.
pub trait AdminGate: Send + Sync {
    fn verify(&self, supplied: Option<&str>) -> Result<(), ApiError>;
}

/// Static shared-secret gate: the credential must equal the configured
/// secret exactly.
#[derive(Clone)]
pub struct SharedSecretGate {
    secret: Option<String>,
}

impl SharedSecretGate {
    /// A gate accepting only `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        SharedSecretGate {
            secret: Some(secret.into()),
        }
    }

    /// A gate built from optional configuration. With no secret configured
    /// every credential is refused.
    pub fn from_config(secret: Option<String>) -> Self {
        SharedSecretGate {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl std::fmt::Debug for SharedSecretGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretGate")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl AdminGate for SharedSecretGate {
    fn verify(&self, supplied: Option<&str>) -> Result<(), ApiError> {
        verify(supplied, self.secret.as_deref())
    }
}

/// Fails with `Unauthorized` unless `supplied` is present, non-empty and
/// exactly equal to `configured`.
pub fn verify(supplied: Option<&str>, configured: Option<&str>) -> Result<(), ApiError> {
    match (supplied, configured) {
        (Some(given), Some(expected)) if !given.is_empty() && given == expected => Ok(()),
        _ => {
            tracing::warn!(
                credential_present = supplied.is_some_and(|s| !s.is_empty()),
                "rejected admin credential"
            );
            Err(ApiError::Unauthorized(
                "invalid admin credentials".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_passes() {
        assert!(verify(Some("s3cret"), Some("s3cret")).is_ok());
        assert!(SharedSecretGate::new("s3cret").verify(Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_or_missing_credential_fails() {
        let gate = SharedSecretGate::new("s3cret");
        for supplied in [None, Some(""), Some("wrong"), Some("S3CRET"), Some("s3cret ")] {
            let err = gate.verify(supplied).unwrap_err();
            assert!(matches!(err, ApiError::Unauthorized(_)), "{supplied:?}");
        }
    }

    #[test]
    fn unconfigured_gate_refuses_everything() {
        let gate = SharedSecretGate::from_config(None);
        assert!(gate.verify(Some("anything")).is_err());

        let gate = SharedSecretGate::from_config(Some(String::new()));
        assert!(gate.verify(Some("")).is_err());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", SharedSecretGate::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}

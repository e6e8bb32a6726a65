//! Credential ports — token issuance/verification and password hashing.

use taskhub_domain::error::TaskHubError;
use taskhub_domain::role::Role;

/// Claims carried by a signed, time-limited credential token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Normalized email of the subject.
    pub email: String,
    pub role: Role,
}

/// Signs and verifies bearer tokens. Expiry is the implementation's
/// concern; a stale or tampered token surfaces as
/// [`TaskHubError::Unauthenticated`].
pub trait TokenCodec {
    /// Issue a signed token for the given claims.
    ///
    /// # Errors
    ///
    /// Returns an error when signing fails.
    fn issue(&self, claims: &Claims) -> Result<String, TaskHubError>;

    /// Verify a token and extract its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Unauthenticated`] on signature mismatch or
    /// expiry.
    fn verify(&self, token: &str) -> Result<Claims, TaskHubError>;
}

/// Hashes and verifies secrets. Verification must be constant-time-safe
/// against the stored hash.
pub trait CredentialHasher {
    /// Hash a plaintext secret for storage.
    ///
    /// # Errors
    ///
    /// Returns an error when hashing fails.
    fn hash(&self, password: &str) -> Result<String, TaskHubError>;

    /// Check a plaintext secret against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

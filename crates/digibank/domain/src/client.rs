//! Bank clients.

use core::fmt;

use bon::Builder;
use chrono::{DateTime, Local};
use dissolve_derive::Dissolve;

/// Internal, monotonic identifier of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

/// A PHC-formatted password hash.
///
/// Never printed: its [`fmt::Debug`] output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

/// A registered bank client. Immutable after registration.
#[derive(Debug, Clone, Builder, Dissolve)]
pub struct Client {
    id: ClientId,

    #[builder(into)]
    first_name: String,

    #[builder(into)]
    last_name: String,

    /// National identity document number, unique across clients.
    #[builder(into)]
    national_id: String,

    #[builder(into, default)]
    address: String,

    #[builder(into, default)]
    phone: String,

    /// Lowercased email address, unique across clients.
    #[builder(into)]
    email: String,

    password_hash: PasswordHash,

    registered_at: DateTime<Local>,
}

impl ClientId {
    /// Returns the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ClientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ClientId> for u64 {
    fn from(ClientId(id): ClientId) -> Self {
        id
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PasswordHash {
    /// Wraps an already computed PHC string.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Returns the PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl Client {
    /// Normalizes an email address for storage and lookup.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Returns the identifier.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Returns the first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns first and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the national identity document number.
    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    /// Returns the postal address, possibly empty.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the phone number, possibly empty.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the registration timestamp.
    pub fn registered_at(&self) -> DateTime<Local> {
        self.registered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_password_hash() {
        let client = Client::builder()
            .id(1u64.into())
            .first_name("Ana")
            .last_name("Pérez")
            .national_id("12345678")
            .email("ana@example.com")
            .password_hash(PasswordHash::new("$argon2id$v=19$secret"))
            .registered_at(Local::now())
            .build();

        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(client.full_name(), "Ana Pérez");
        assert!(client.address().is_empty());
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(Client::normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}

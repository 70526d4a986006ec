//! User accounts.
//!
//! `Accounts` is the seam to the real user store. `MemoryAccounts` keeps
//! accounts in process memory and is meant for development and tests; it
//! performs no password hashing.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Email already exists")]
    EmailTaken,
}

pub trait Accounts: Send + Sync {
    fn register(&self, account: NewAccount) -> Result<(), AccountError>;
    /// True if `email` exists and `password` is its password.
    fn verify(&self, email: &str, password: &str) -> bool;
    fn exists(&self, email: &str) -> bool;
}

/// Loose structural email check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// Check registration input, returning every problem found.
pub fn validate_registration(account: &NewAccount, confirm_password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if [&account.first_name, &account.last_name, &account.email, &account.password]
        .iter()
        .any(|f| f.is_empty())
    {
        errors.push("All fields are required");
    }
    if !is_valid_email(&account.email) {
        errors.push("Email is not valid");
    }
    if account.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("Password must be at least 5 characters long");
    }
    if account.password != confirm_password {
        errors.push("Passwords do not match");
    }
    errors
}

#[derive(Debug, Default)]
pub struct MemoryAccounts {
    accounts: DashMap<String, NewAccount>,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accounts for MemoryAccounts {
    fn register(&self, account: NewAccount) -> Result<(), AccountError> {
        match self.accounts.entry(account.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AccountError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn verify(&self, email: &str, password: &str) -> bool {
        self.accounts
            .get(&email.to_lowercase())
            .map(|a| a.password == password)
            .unwrap_or(false)
    }

    fn exists(&self, email: &str) -> bool {
        self.accounts.contains_key(&email.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str, password: &str) -> NewAccount {
        NewAccount {
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@example..com"));
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration(&account("ana@example.com", "secret"), "secret").is_empty());
        assert_eq!(
            validate_registration(&account("bad", "abc"), "abd"),
            [
                "Email is not valid",
                "Password must be at least 5 characters long",
                "Passwords do not match"
            ]
        );
    }

    #[test]
    fn test_register_and_verify() {
        let accounts = MemoryAccounts::new();
        accounts.register(account("Ana@Example.com", "secret")).unwrap();

        assert!(accounts.exists("ana@example.com"));
        assert!(accounts.verify("ana@example.com", "secret"));
        assert!(!accounts.verify("ana@example.com", "wrong"));
        assert!(!accounts.verify("bob@example.com", "secret"));
        assert_eq!(
            accounts.register(account("ana@example.com", "other")),
            Err(AccountError::EmailTaken)
        );
    }
}

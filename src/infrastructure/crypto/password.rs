//! Password hashing utilities

use bcrypt::{hash, verify};

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let h = hash_password("s3cret!").unwrap();
        assert!(verify_password("s3cret!", &h).unwrap());
        assert!(!verify_password("other", &h).unwrap());
    }
}

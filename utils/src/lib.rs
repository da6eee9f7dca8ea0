use common::errors::Error;

pub mod claims;
pub mod mongodb_tester;

/// bcrypt cost; the default is noticeably slow for request handlers
const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, Error> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, Error> {
    Ok(bcrypt::verify(password, hashed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_works() {
        let hashed = hash_password("secret").unwrap();
        assert_ne!(hashed, "secret");
        assert!(verify_password("secret", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }
}

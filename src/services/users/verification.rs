use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Fresh email verification code: 16 random bytes, URL-safe base64 without padding.
pub fn generate_verification_code() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_url_safe_and_unique() {
        let a = generate_verification_code().unwrap();
        let b = generate_verification_code().unwrap();
        assert_eq!(a.len(), 22);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }
}

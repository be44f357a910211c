use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;

/// In-memory store of password-reset codes. Codes never expire; a code is
/// consumed by a successful reset or replaced by a newer one.
#[derive(Debug, Clone, Default)]
pub struct VerificationCodes {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl VerificationCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a four-digit, zero-padded code for `email`, replacing any previous one.
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:04}", rand::thread_rng().gen_range(0..10_000));
        self.lock().insert(email.to_string(), code.clone());
        code
    }

    pub fn verify(&self, email: &str, code: &str) -> bool {
        self.lock().get(email).is_some_and(|stored| stored == code)
    }

    pub fn remove(&self, email: &str) {
        self.lock().remove(email);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning only follows a panic in another holder; the map itself stays consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_code_is_four_digits() {
        let codes = VerificationCodes::new();
        for _ in 0..50 {
            let code = codes.issue("a@b.c");
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_verify_matches_latest_code_only() {
        let codes = VerificationCodes::new();
        let code = codes.issue("a@b.c");
        assert!(codes.verify("a@b.c", &code));
        assert!(!codes.verify("a@b.c", "abcd"));
        assert!(!codes.verify("other@b.c", &code));
    }

    #[test]
    fn test_remove_invalidates_code() {
        let codes = VerificationCodes::new();
        let code = codes.issue("a@b.c");
        codes.remove("a@b.c");
        assert!(!codes.verify("a@b.c", &code));
    }

    #[test]
    fn test_clones_share_storage() {
        let codes = VerificationCodes::new();
        let handle = codes.clone();
        let code = codes.issue("a@b.c");
        assert!(handle.verify("a@b.c", &code));
    }
}

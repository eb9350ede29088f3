//! One-time-password store for phone login
//!
//! Keyed TTL store held in application state and injected into the auth
//! service, so a horizontally-scaled deployment can swap it for a shared
//! store. Codes are held as HMAC-SHA256 digests; a code verifies at most
//! once and expires after the configured TTL.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

struct OtpEntry {
    digest: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// In-memory OTP store; contents are ephemeral and lost on restart
pub struct OtpStore {
    secret: Vec<u8>,
    ttl: Duration,
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl OtpStore {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::seconds(ttl_seconds as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Validity window of issued codes in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a fresh 6-digit code for a phone number, replacing any
    /// outstanding code for the same number. Returns the code for delivery.
    pub fn issue(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let entry = OtpEntry {
            digest: self.digest(phone, &code),
            expires_at: Utc::now() + self.ttl,
        };

        let mut entries = self.lock();
        purge_expired(&mut entries);
        entries.insert(phone.to_string(), entry);
        code
    }

    /// Verify a code for a phone number. Consumes the code on success.
    pub fn verify(&self, phone: &str, code: &str) -> bool {
        let mut entries = self.lock();
        purge_expired(&mut entries);

        let matches = match entries.get(phone) {
            Some(entry) => {
                let mut mac = HmacSha256::new_from_slice(&self.secret)
                    .expect("HMAC accepts keys of any length");
                mac.update(phone.as_bytes());
                mac.update(b":");
                mac.update(code.as_bytes());
                mac.verify_slice(&entry.digest).is_ok()
            }
            None => false,
        };

        if matches {
            entries.remove(phone);
        }
        matches
    }

    fn digest(&self, phone: &str, code: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(phone.as_bytes());
        mac.update(b":");
        mac.update(code.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, OtpEntry>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map stays usable
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn purge_expired(entries: &mut HashMap<String, OtpEntry>) {
    let now = Utc::now();
    entries.retain(|_, entry| entry.expires_at > now);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_code_verifies_once() {
        let store = OtpStore::new("test-secret", 300);
        let code = store.issue("9812345678");

        assert_eq!(code.len(), 6);
        assert!(store.verify("9812345678", &code));
        // Single use
        assert!(!store.verify("9812345678", &code));
    }

    #[test]
    fn test_wrong_code_is_rejected_and_not_consumed() {
        let store = OtpStore::new("test-secret", 300);
        let code = store.issue("9812345678");

        assert!(!store.verify("9812345678", "000000") || code == "000000");
        assert!(store.verify("9812345678", &code));
    }

    #[test]
    fn test_code_is_bound_to_phone() {
        let store = OtpStore::new("test-secret", 300);
        let code = store.issue("9812345678");

        assert!(!store.verify("9898989898", &code));
    }

    #[test]
    fn test_reissue_replaces_outstanding_code() {
        let store = OtpStore::new("test-secret", 300);
        let first = store.issue("9812345678");
        let second = store.issue("9812345678");

        if first != second {
            assert!(!store.verify("9812345678", &first));
        }
        assert!(store.verify("9812345678", &second));
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let store = OtpStore::new("test-secret", 0);
        let code = store.issue("9812345678");

        assert!(!store.verify("9812345678", &code));
    }
}

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Code handed out by the stub verifier on every send
pub const STUB_CODE: &str = "1234";

/// Minimum code length accepted by the stub policy
pub const STUB_MIN_CODE_LEN: usize = 4;

#[derive(Debug, Error)]
#[error("sms dispatch failed: {0}")]
pub struct SmsError(pub String);

/// Out-of-band delivery of verification codes
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, code: &str) -> Result<(), SmsError>;
}

/// Sender that only writes the dispatch to the log
#[derive(Debug, Default, Clone)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, phone: &str, code: &str) -> Result<(), SmsError> {
        tracing::info!(phone = %mask_phone(phone), code, "[SMS] verification code dispatched");
        Ok(())
    }
}

/// Decides whether a (phone, code) claim proves ownership of the phone.
///
/// Implementations backed by a real one-time-code store consume the code on a
/// successful `verify`; no other side effect is allowed.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Issue a code for `phone` and hand it to the delivery channel.
    /// Returns the issued code so development builds can echo it.
    async fn send_code(&self, phone: &str) -> String;

    async fn verify(&self, phone: &str, code: &str) -> bool;
}

/// Placeholder policy: any all-digit code of at least four characters passes
/// for any phone. Not a security property; swap it for a real code store.
pub struct StubCodeVerifier {
    sms: Arc<dyn SmsSender>,
}

impl StubCodeVerifier {
    pub fn new(sms: Arc<dyn SmsSender>) -> Self {
        Self { sms }
    }
}

impl Default for StubCodeVerifier {
    fn default() -> Self {
        Self::new(Arc::new(LogSmsSender))
    }
}

#[async_trait]
impl CredentialVerifier for StubCodeVerifier {
    async fn send_code(&self, phone: &str) -> String {
        // Fire and forget: delivery failures never reach the caller
        if let Err(e) = self.sms.send(phone, STUB_CODE).await {
            tracing::warn!(phone = %mask_phone(phone), "{}", e);
        }
        STUB_CODE.to_string()
    }

    async fn verify(&self, _phone: &str, code: &str) -> bool {
        code.len() >= STUB_MIN_CODE_LEN && code.chars().all(|c| c.is_ascii_digit())
    }
}

/// Mask the middle of a phone number for logs: 13800000000 -> 138****0000
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 7), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSms {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SmsSender for RecordingSms {
        async fn send(&self, phone: &str, code: &str) -> Result<(), SmsError> {
            self.sent.lock().unwrap().push((phone.to_string(), code.to_string()));
            Ok(())
        }
    }

    struct FailingSms;

    #[async_trait]
    impl SmsSender for FailingSms {
        async fn send(&self, _phone: &str, _code: &str) -> Result<(), SmsError> {
            Err(SmsError("gateway down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_stub_accepts_digit_codes() {
        let verifier = StubCodeVerifier::default();
        assert!(verifier.verify("13800000000", "1234").await);
        assert!(verifier.verify("13800000000", "9999").await);
        assert!(verifier.verify("13900000000", "000000").await);
    }

    #[tokio::test]
    async fn test_stub_rejects_short_or_non_digit_codes() {
        let verifier = StubCodeVerifier::default();
        assert!(!verifier.verify("13800000000", "").await);
        assert!(!verifier.verify("13800000000", "123").await);
        assert!(!verifier.verify("13800000000", "12a4").await);
        assert!(!verifier.verify("13800000000", "１２３４").await);
    }

    #[tokio::test]
    async fn test_send_code_dispatches_stub_code() {
        let sms = Arc::new(RecordingSms::default());
        let verifier = StubCodeVerifier::new(sms.clone());

        let code = verifier.send_code("13800000000").await;
        assert_eq!(code, STUB_CODE);
        assert_eq!(
            *sms.sent.lock().unwrap(),
            vec![("13800000000".to_string(), STUB_CODE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_send_code_swallows_dispatch_failure() {
        let verifier = StubCodeVerifier::new(Arc::new(FailingSms));
        assert_eq!(verifier.send_code("13800000000").await, STUB_CODE);
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("13800000000"), "138****0000");
        assert_eq!(mask_phone("123"), "***");
    }
}

use std::sync::Arc;

use crate::auth::credentials::mask_phone;
use crate::auth::{AuthError, CredentialVerifier, TokenCodec};
use crate::database::models::User;
use crate::database::{IdentityStore, StoreError};

/// Token plus the identity it was issued for
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Registration and login via phone verification.
///
/// Stateless per call: every successful register or login issues a fresh
/// token, nothing is cached between calls.
#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn IdentityStore>,
    verifier: Arc<dyn CredentialVerifier>,
    tokens: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        verifier: Arc<dyn CredentialVerifier>,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self {
            identities,
            verifier,
            tokens,
        }
    }

    /// Dispatch a verification code to `phone`; returns the issued code
    pub async fn send_code(&self, phone: &str) -> String {
        self.verifier.send_code(phone).await
    }

    pub async fn register(
        &self,
        phone: &str,
        nickname: &str,
        code: &str,
    ) -> Result<AuthSession, AuthError> {
        if self.identities.find_by_phone(phone).await?.is_some() {
            tracing::info!(phone = %mask_phone(phone), "Register rejected: already registered");
            return Err(AuthError::AlreadyRegistered);
        }

        if !self.verifier.verify(phone, code).await {
            tracing::info!(phone = %mask_phone(phone), "Register rejected: invalid code");
            return Err(AuthError::InvalidCode);
        }

        // Lost a race with a concurrent registration for the same phone
        let user = match self.identities.create(phone, nickname).await {
            Ok(user) => user,
            Err(StoreError::Conflict(_)) => return Err(AuthError::AlreadyRegistered),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, phone = %mask_phone(phone), "User registered");
        self.session_for(user)
    }

    pub async fn login(&self, phone: &str, code: &str) -> Result<AuthSession, AuthError> {
        let user = match self.identities.find_by_phone(phone).await? {
            Some(user) => user,
            None => {
                tracing::info!(phone = %mask_phone(phone), "Login rejected: not registered");
                return Err(AuthError::NotRegistered);
            }
        };

        if !self.verifier.verify(phone, code).await {
            tracing::info!(phone = %mask_phone(phone), "Login rejected: invalid code");
            return Err(AuthError::InvalidCode);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.session_for(user)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let ttl = self.tokens.default_ttl();
        let token = self.tokens.issue(user.id, ttl)?;
        Ok(AuthSession {
            token,
            expires_in: ttl.num_seconds(),
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StubCodeVerifier;
    use crate::database::MemoryIdentityStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts verify calls and answers with a fixed verdict
    struct CountingVerifier {
        verdict: bool,
        calls: AtomicUsize,
    }

    impl CountingVerifier {
        fn new(verdict: bool) -> Self {
            Self {
                verdict,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialVerifier for CountingVerifier {
        async fn send_code(&self, _phone: &str) -> String {
            "0000".to_string()
        }

        async fn verify(&self, _phone: &str, _code: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
        }
    }

    fn service_with(verifier: Arc<dyn CredentialVerifier>) -> (AuthService, Arc<TokenCodec>) {
        let tokens = Arc::new(TokenCodec::new("flow_secret", Duration::days(7)));
        let service = AuthService::new(
            Arc::new(MemoryIdentityStore::new()),
            verifier,
            tokens.clone(),
        );
        (service, tokens)
    }

    fn stub_service() -> (AuthService, Arc<TokenCodec>) {
        service_with(Arc::new(StubCodeVerifier::default()))
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let (service, tokens) = stub_service();

        let session = service.register("13800000000", "Alice", "1234").await.unwrap();
        assert_eq!(session.user.nickname, "Alice");
        assert_eq!(session.user.phone.as_deref(), Some("13800000000"));
        assert_eq!(session.expires_in, 7 * 24 * 3600);
        assert_eq!(tokens.verify(&session.token).unwrap(), session.user.id);

        let err = service.register("13800000000", "Alice", "1234").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn duplicate_register_wins_over_bad_code() {
        let (service, _) = stub_service();
        service.register("13800000000", "Alice", "1234").await.unwrap();

        let err = service.register("13800000000", "Eve", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn register_with_bad_code_creates_nothing() {
        let (service, _) = stub_service();
        let err = service.register("13800000000", "Alice", "12").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));

        let err = service.login("13800000000", "1234").await.unwrap_err();
        assert!(matches!(err, AuthError::NotRegistered));
    }

    #[tokio::test]
    async fn stub_login_accepts_unsent_code() {
        // Known gap: the stub accepts any 4+ digit code, even one never sent
        let (service, tokens) = stub_service();
        let registered = service.register("13800000000", "Alice", "1234").await.unwrap();

        let session = service.login("13800000000", "9999").await.unwrap();
        assert_eq!(session.user.id, registered.user.id);
        assert_eq!(tokens.verify(&session.token).unwrap(), registered.user.id);
    }

    #[tokio::test]
    async fn login_unknown_phone_skips_code_check() {
        let verifier = Arc::new(CountingVerifier::new(true));
        let (service, _) = service_with(verifier.clone());

        let err = service.login("13800000000", "1234").await.unwrap_err();
        assert!(matches!(err, AuthError::NotRegistered));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn login_with_rejected_code() {
        let (service, _) = stub_service();
        service.register("13800000000", "Alice", "1234").await.unwrap();

        let err = service.login("13800000000", "abcd").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCode));
    }

    #[tokio::test]
    async fn register_existing_phone_skips_code_check() {
        let verifier = Arc::new(CountingVerifier::new(true));
        let (service, _) = service_with(verifier.clone());

        service.register("13800000000", "Alice", "1234").await.unwrap();
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);

        let err = service.register("13800000000", "Alice", "1234").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_registers_one_winner() {
        let (service, _) = stub_service();
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .register("13800000000", &format!("racer{i}"), "1234")
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(AuthError::AlreadyRegistered) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(winners, 1);
    }
}

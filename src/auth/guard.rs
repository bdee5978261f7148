use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::token::TokenCodec;
use crate::database::models::User;
use crate::database::IdentityStore;

/// Any entity whose mutation is restricted to its creator
pub trait OwnedResource {
    fn owner_id(&self) -> Uuid;
}

/// Resolves bearer tokens to callers and checks resource ownership
#[derive(Clone)]
pub struct AuthorizationGuard {
    tokens: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
}

impl AuthorizationGuard {
    pub fn new(tokens: Arc<TokenCodec>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, identities }
    }

    /// Token -> live identity. A valid token for a user that no longer
    /// exists is treated the same as a bad token.
    pub async fn resolve_caller(&self, token: &str) -> Result<User, AuthError> {
        let subject = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        match self.identities.find_by_id(subject).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!("Token subject {} no longer exists", subject);
                Err(AuthError::Unauthenticated)
            }
        }
    }

    pub fn authorize_ownership<R: OwnedResource + ?Sized>(resource: &R, caller: &User) -> bool {
        resource.owner_id() == caller.id
    }

    /// `Forbidden` unless `caller` owns `resource`
    pub fn ensure_owner<R: OwnedResource + ?Sized>(
        resource: &R,
        caller: &User,
    ) -> Result<(), AuthError> {
        if Self::authorize_ownership(resource, caller) {
            Ok(())
        } else {
            tracing::warn!(
                "User {} denied mutation of resource owned by {}",
                caller.id,
                resource.owner_id()
            );
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryIdentityStore;
    use chrono::{Duration, Utc};

    struct Owned(Uuid);

    impl OwnedResource for Owned {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    fn setup() -> (AuthorizationGuard, Arc<TokenCodec>, Arc<MemoryIdentityStore>) {
        let tokens = Arc::new(TokenCodec::new("guard_secret", Duration::days(7)));
        let store = Arc::new(MemoryIdentityStore::new());
        let guard = AuthorizationGuard::new(tokens.clone(), store.clone());
        (guard, tokens, store)
    }

    #[tokio::test]
    async fn resolves_live_identity() {
        let (guard, tokens, store) = setup();
        let user = store.create("13800000000", "Alice").await.unwrap();
        let token = tokens.issue_default(user.id).unwrap();

        assert_eq!(guard.resolve_caller(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn rejects_bad_and_expired_tokens() {
        let (guard, tokens, store) = setup();
        let user = store.create("13800000000", "Alice").await.unwrap();

        let expired = tokens
            .issue_at(user.id, Utc::now() - Duration::days(8), Duration::days(7))
            .unwrap();
        assert!(matches!(
            guard.resolve_caller(&expired).await,
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(
            guard.resolve_caller("garbage").await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn rejects_token_for_deleted_identity() {
        let (guard, tokens, store) = setup();
        let user = store.create("13800000000", "Alice").await.unwrap();
        let token = tokens.issue_default(user.id).unwrap();
        store.remove(user.id).await;

        assert!(matches!(
            guard.resolve_caller(&token).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn rejects_token_for_unknown_subject() {
        let (guard, tokens, _store) = setup();
        let token = tokens.issue_default(Uuid::new_v4()).unwrap();
        assert!(matches!(
            guard.resolve_caller(&token).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn ownership_requires_matching_id() {
        let (_guard, _tokens, store) = setup();
        let alice = store.create("13800000000", "Alice").await.unwrap();
        let bob = store.create("13900000000", "Bob").await.unwrap();
        let resource = Owned(alice.id);

        assert!(AuthorizationGuard::authorize_ownership(&resource, &alice));
        assert!(!AuthorizationGuard::authorize_ownership(&resource, &bob));
        assert!(AuthorizationGuard::ensure_owner(&resource, &alice).is_ok());
        assert!(matches!(
            AuthorizationGuard::ensure_owner(&resource, &bob),
            Err(AuthError::Forbidden)
        ));
    }
}

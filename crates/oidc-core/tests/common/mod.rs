//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use indexmap::IndexSet;
use time::{Duration, OffsetDateTime};
use tokio_util::sync::CancellationToken;

use oidc_core::pkce::{CodeChallengeMethod, s256_challenge};
use oidc_core::prelude::*;
use oidc_core::token::{AccessTokenRequest, IdTokenRequest, RefreshTokenRequest};
use oidc_core::types::{ProfileResult, ResourceOwnerProfile, ResponseTypeToken};

pub const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
pub const REDIRECT_URI: &str = "https://app.example.com/callback";
pub const SUBJECT: &str = "alice";

pub fn scopes(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Web client allowed to use every grant and both response types.
pub fn web_client() -> Client {
    Client::new("web-app")
        .with_grant_types([
            GrantType::AuthorizationCode,
            GrantType::Implicit,
            GrantType::RefreshToken,
            GrantType::ClientCredentials,
        ])
        .with_response_types([ResponseTypeToken::Code, ResponseTypeToken::IdToken])
        .with_redirect_uris([REDIRECT_URI, "http://127.0.0.1:4000/cb"])
        .with_scopes(["openid", "profile", "email", "offline_access", "api"])
}

pub fn cancel() -> CancellationToken {
    CancellationToken::new()
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Default)]
pub struct MockClientStorage {
    clients: RwLock<HashMap<String, Client>>,
}

impl MockClientStorage {
    pub fn with_client(client: Client) -> Self {
        let storage = Self::default();
        storage.add_client(client);
        storage
    }

    pub fn add_client(&self, client: Client) {
        self.clients
            .write()
            .unwrap()
            .insert(client.client_id.clone(), client);
    }
}

#[async_trait]
impl ClientStorage for MockClientStorage {
    async fn find_enabled(
        &self,
        client_id: &str,
        _cancel: &CancellationToken,
    ) -> CoreResult<Option<Client>> {
        Ok(self.clients.read().unwrap().get(client_id).cloned())
    }
}

#[derive(Default)]
pub struct MockCodeStorage {
    codes: RwLock<HashMap<String, AuthorizationCode>>,
    next: AtomicUsize,
}

#[async_trait]
impl AuthorizationCodeStorage for MockCodeStorage {
    async fn create(
        &self,
        code: AuthorizationCode,
        _cancel: &CancellationToken,
    ) -> CoreResult<String> {
        let handle = format!("code-{}", self.next.fetch_add(1, Ordering::SeqCst));
        self.codes.write().unwrap().insert(handle.clone(), code);
        Ok(handle)
    }

    async fn consume(
        &self,
        handle: &str,
        _cancel: &CancellationToken,
    ) -> CoreResult<Option<AuthorizationCode>> {
        Ok(self.codes.write().unwrap().remove(handle))
    }
}

#[derive(Default)]
pub struct MockRefreshTokenStorage {
    tokens: RwLock<HashMap<String, RefreshToken>>,
    next: AtomicUsize,
}

#[async_trait]
impl RefreshTokenStorage for MockRefreshTokenStorage {
    async fn create(&self, token: RefreshToken, _cancel: &CancellationToken) -> CoreResult<String> {
        let handle = format!("rt-{}", self.next.fetch_add(1, Ordering::SeqCst));
        self.tokens.write().unwrap().insert(handle.clone(), token);
        Ok(handle)
    }

    async fn consume(
        &self,
        handle: &str,
        _cancel: &CancellationToken,
    ) -> CoreResult<Option<RefreshToken>> {
        Ok(self.tokens.write().unwrap().remove(handle))
    }
}

#[derive(Default)]
pub struct MockConsentStorage {
    consents: RwLock<HashMap<(String, String), GrantedConsent>>,
}

impl MockConsentStorage {
    pub fn grant(&self, subject_id: &str, client_id: &str, granted: &[&str]) {
        self.consents.write().unwrap().insert(
            (subject_id.to_string(), client_id.to_string()),
            GrantedConsent {
                subject_id: subject_id.to_string(),
                client_id: client_id.to_string(),
                granted_scopes: scopes(granted),
            },
        );
    }

    pub fn revoke(&self, subject_id: &str, client_id: &str) {
        self.consents
            .write()
            .unwrap()
            .remove(&(subject_id.to_string(), client_id.to_string()));
    }
}

#[async_trait]
impl ConsentStorage for MockConsentStorage {
    async fn find(
        &self,
        subject_id: &str,
        client: &Client,
        _cancel: &CancellationToken,
    ) -> CoreResult<Option<GrantedConsent>> {
        Ok(self
            .consents
            .read()
            .unwrap()
            .get(&(subject_id.to_string(), client.client_id.clone()))
            .cloned())
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Default)]
pub struct MockProfileService {
    disabled: RwLock<HashMap<String, bool>>,
}

impl MockProfileService {
    pub fn disable(&self, subject_id: &str) {
        self.disabled
            .write()
            .unwrap()
            .insert(subject_id.to_string(), true);
    }
}

#[async_trait]
impl ProfileService for MockProfileService {
    async fn get_profile(
        &self,
        essential_claims: &EssentialClaims,
        _granted_resources: &ValidResources,
        _cancel: &CancellationToken,
    ) -> CoreResult<ProfileResult> {
        let subject_id = essential_claims.subject_id();
        let disabled = self
            .disabled
            .read()
            .unwrap()
            .get(subject_id)
            .copied()
            .unwrap_or(false);
        Ok(ProfileResult {
            is_active: !disabled,
            profile: ResourceOwnerProfile::new(subject_id),
        })
    }
}

pub fn scope_catalog() -> Arc<ScopeCatalog> {
    Arc::new(ScopeCatalog::with_standard_scopes().with_scope(
        oidc_core::services::ScopeDefinition::new(
            "api",
            [oidc_core::services::ScopeTokenType::AccessToken],
        ),
    ))
}

// =============================================================================
// Issuers
// =============================================================================

#[derive(Default)]
pub struct MockIssuer {
    pub access_tokens: AtomicUsize,
    pub id_tokens: AtomicUsize,
    pub refresh_tokens: AtomicUsize,
    pub fail_id_tokens: bool,
    pub rotated_from: RwLock<Vec<IndexSet<String>>>,
}

impl MockIssuer {
    fn issued(prefix: &str, count: &AtomicUsize, issued_at: OffsetDateTime) -> IssuedToken {
        IssuedToken {
            handle: format!("{prefix}-{}", count.fetch_add(1, Ordering::SeqCst)),
            lifetime: Duration::minutes(5),
            issued_at,
        }
    }
}

#[async_trait]
impl AccessTokenIssuer for MockIssuer {
    async fn create_access_token(
        &self,
        request: AccessTokenRequest<'_>,
        _cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken> {
        Ok(Self::issued("at", &self.access_tokens, request.issued_at))
    }
}

#[async_trait]
impl IdTokenIssuer for MockIssuer {
    async fn create_id_token(
        &self,
        request: IdTokenRequest<'_>,
        _cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken> {
        if self.fail_id_tokens {
            return Err(CoreError::storage("signing key unavailable"));
        }
        Ok(Self::issued("id", &self.id_tokens, request.issued_at))
    }
}

#[async_trait]
impl RefreshTokenIssuer for MockIssuer {
    async fn create_refresh_token(
        &self,
        request: RefreshTokenRequest<'_>,
        _cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken> {
        if let Some(previous) = request.previous {
            self.rotated_from
                .write()
                .unwrap()
                .push(previous.granted_scopes.clone());
        }
        Ok(Self::issued("rt", &self.refresh_tokens, request.issued_at))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn authorization_code(client_id: &str, granted: &[&str]) -> AuthorizationCode {
    let now = OffsetDateTime::now_utc();
    AuthorizationCode {
        client_id: client_id.to_string(),
        essential_claims: EssentialClaims::new(SUBJECT, now),
        granted_scopes: scopes(granted),
        code_challenge: s256_challenge(VERIFIER),
        code_challenge_method: CodeChallengeMethod::S256,
        redirect_uri: Some(REDIRECT_URI.to_string()),
        nonce: Some("n-0S6_WzA2Mj".to_string()),
        issued_at: now,
        expires_at: now + Duration::minutes(5),
    }
}

pub fn refresh_token(client_id: &str, granted: &[&str]) -> RefreshToken {
    let now = OffsetDateTime::now_utc();
    RefreshToken {
        client_id: client_id.to_string(),
        essential_claims: EssentialClaims::new(SUBJECT, now),
        granted_scopes: scopes(granted),
        reference_access_token_handle: None,
        issued_at: now,
        expires_at: now + Duration::days(30),
    }
}

/// Token endpoint collaborators wired together.
pub struct TokenHarness {
    pub codes: Arc<MockCodeStorage>,
    pub refresh_tokens: Arc<MockRefreshTokenStorage>,
    pub consents: Arc<MockConsentStorage>,
    pub profiles: Arc<MockProfileService>,
    pub validator: TokenRequestValidator,
}

impl TokenHarness {
    pub fn new() -> Self {
        let codes = Arc::new(MockCodeStorage::default());
        let refresh_tokens = Arc::new(MockRefreshTokenStorage::default());
        let consents = Arc::new(MockConsentStorage::default());
        let profiles = Arc::new(MockProfileService::default());
        let validator = TokenRequestValidator::new(
            ConfigHandle::default(),
            codes.clone(),
            refresh_tokens.clone(),
            consents.clone(),
            profiles.clone(),
            scope_catalog(),
        );
        Self {
            codes,
            refresh_tokens,
            consents,
            profiles,
            validator,
        }
    }

    pub async fn store_code(&self, code: AuthorizationCode) -> String {
        self.codes.create(code, &cancel()).await.unwrap()
    }

    pub async fn store_refresh_token(&self, token: RefreshToken) -> String {
        self.refresh_tokens.create(token, &cancel()).await.unwrap()
    }
}

// src/session.rs
//! Session and identity: who is signed in and what they may do.
//!
//! The identity provider (sign-up, credentials, password reset) is an
//! external service consumed through [`IdentityService`]. This module owns
//! the explicit session context - resolved once at startup, cleared on
//! sign-out - and the role lookup against the `users` collection, where a
//! missing role record is backfilled with the default role.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::{ApiError, ApiResult};
use crate::models::{ProfileUpdate, User, UserRole};
use crate::repo::Collection;
use crate::store::StoreError;

// ==================== IDENTITY PROVIDER BOUNDARY ====================

/// The account shape the identity provider exposes; the role is not its
/// business.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ApiResult<AccountProfile>;

    async fn current_user(&self) -> ApiResult<Option<AccountProfile>>;

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> ApiResult<()>;

    async fn sign_out(&self) -> ApiResult<()>;
}

// ==================== ROLE RESOLUTION ====================

/// Resolves the signed-in user, enriching the identity profile with the
/// role kept in the `users` collection. A missing role record is created
/// with the default role; a failing role lookup degrades to the default
/// role rather than blocking sign-in.
pub async fn resolve_user(
    identity: &dyn IdentityService,
    users: &Collection<User>,
) -> ApiResult<Option<User>> {
    let profile = match identity.current_user().await? {
        Some(profile) => profile,
        None => return Ok(None),
    };

    let display_name =
        User::display_name_or_default(&profile.email, profile.display_name.as_deref());

    let role = match users.get(&profile.id).await {
        Ok(stored) => stored.role,
        Err(StoreError::NotFound(_)) => {
            let record = User {
                id: profile.id.clone(),
                email: profile.email.clone(),
                display_name: display_name.clone(),
                photo_url: profile.photo_url.clone(),
                role: UserRole::default(),
            };
            if let Err(e) = users.put(&record).await {
                log::warn!("failed to backfill role record for {}: {}", profile.id, e);
            }
            UserRole::default()
        }
        Err(e) => {
            log::warn!("role lookup failed for {}: {}; defaulting", profile.id, e);
            UserRole::default()
        }
    };

    Ok(Some(User {
        id: profile.id,
        email: profile.email,
        display_name,
        photo_url: profile.photo_url,
        role,
    }))
}

// ==================== SESSION CONTEXT ====================

/// Explicit session state handed to the parts that need it; initialized on
/// app start, cleared on sign-out. Not a singleton.
#[derive(Default)]
pub struct SessionContext {
    user: Option<User>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn init(
        &mut self,
        identity: &dyn IdentityService,
        users: &Collection<User>,
    ) -> ApiResult<()> {
        self.user = resolve_user(identity, users).await?;
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> ApiResult<&User> {
        self.user.as_ref().ok_or_else(ApiError::signed_in_required)
    }

    pub fn require_admin(&self) -> ApiResult<&User> {
        let user = self.require_user()?;
        if !user.role.is_admin() {
            return Err(ApiError::admin_required());
        }
        Ok(user)
    }

    /// Signs out at the provider, then drops the local session state. The
    /// local state survives a provider failure so the caller can retry.
    pub async fn sign_out(&mut self, identity: &dyn IdentityService) -> ApiResult<()> {
        identity.sign_out().await?;
        self.user = None;
        Ok(())
    }
}

// ==================== STAND-IN PROVIDER ====================

/// Identity stand-in for deployments without a reachable provider: one
/// operator account from configuration. Account creation belongs to the
/// real provider and is reported unavailable.
pub struct StaticIdentity {
    profile: RwLock<Option<AccountProfile>>,
}

impl StaticIdentity {
    pub fn new(profile: Option<AccountProfile>) -> Self {
        Self {
            profile: RwLock::new(profile),
        }
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl IdentityService for StaticIdentity {
    async fn create_account(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> ApiResult<AccountProfile> {
        Err(ApiError::Unavailable(
            "account creation is handled by the external identity provider".to_string(),
        ))
    }

    async fn current_user(&self) -> ApiResult<Option<AccountProfile>> {
        Ok(self.profile.read().expect("identity lock poisoned").clone())
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> ApiResult<()> {
        let mut guard = self.profile.write().expect("identity lock poisoned");
        match guard.as_mut() {
            Some(profile) if profile.id == user_id => {
                if let Some(name) = update.display_name {
                    profile.display_name = Some(name);
                }
                if let Some(url) = update.photo_url {
                    profile.photo_url = Some(url);
                }
                Ok(())
            }
            _ => Err(ApiError::not_found("user")),
        }
    }

    async fn sign_out(&self) -> ApiResult<()> {
        self.profile.write().expect("identity lock poisoned").take();
        Ok(())
    }
}

// ==================== TESTS ====================

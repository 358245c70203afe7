//! Pre-navigation access check.
//!
//! The decision is computed from a fresh read of durable storage, not from
//! the in-memory session, so a token written or cleared by another process
//! is honoured immediately.

use crate::consts::{PROFILE_KEY, TOKEN_KEY};
use crate::session::Profile;
use crate::storage::Storage;

use super::routes::{Resolved, Route, resolve};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GuardDecision {
    Allowed,
    /// `redirect` is the intended destination, for use after login
    RedirectLogin { redirect: String },
    RedirectHome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Requirements {
    pub(crate) requires_auth: bool,
    pub(crate) requires_admin: bool,
}

impl Requirements {
    /// A requirement on any matched record applies to the whole navigation
    pub(crate) fn of(matched: &[&Route]) -> Self {
        Self {
            requires_auth: matched.iter().any(|r| r.meta.requires_auth),
            requires_admin: matched.iter().any(|r| r.meta.requires_admin),
        }
    }
}

pub(crate) fn decide(
    requirements: Requirements,
    token: Option<&str>,
    profile: Option<&Profile>,
    full_path: &str,
) -> GuardDecision {
    let has_token = token.is_some_and(|t| !t.is_empty());
    if requirements.requires_auth && !has_token {
        return GuardDecision::RedirectLogin {
            redirect: full_path.to_string(),
        };
    }
    if requirements.requires_admin && !profile.is_some_and(Profile::is_admin) {
        return GuardDecision::RedirectHome;
    }
    GuardDecision::Allowed
}

#[derive(Debug)]
pub(crate) struct Navigation {
    pub(crate) resolved: Resolved,
    pub(crate) decision: GuardDecision,
}

pub(crate) fn before_each(target: &str, storage: &dyn Storage) -> Navigation {
    let resolved = resolve(target);
    let token = storage.get_item(TOKEN_KEY);
    let profile = storage
        .get_item(PROFILE_KEY)
        .and_then(|raw| Profile::from_storage(&raw));

    let decision = decide(
        Requirements::of(&resolved.matched),
        token.as_deref(),
        profile.as_ref(),
        &resolved.full_path,
    );
    tracing::debug!(target, path = %resolved.full_path, ?decision, "route guard");
    Navigation { resolved, decision }
}

use std::cell::{Ref, RefCell};

use serde_json::{Map, Value};

use crate::client::{ApiClient, ApiRequest};
use crate::consts::{PROFILE_KEY, TOKEN_KEY};
use crate::error::{AppError, StorageError};
use crate::storage::Storage;

use super::types::{AuthPayload, Credentials, Profile, Registration, Session};

/// Current user session, mirrored into durable storage on every mutation.
///
/// The in-memory copy is updated first; a failed storage write is returned
/// to the caller but not rolled back.
pub(crate) struct SessionStore {
    state: RefCell<Session>,
    storage: Box<dyn Storage>,
}

impl SessionStore {
    pub(crate) fn load(storage: Box<dyn Storage>) -> Self {
        let token = storage.get_item(TOKEN_KEY).unwrap_or_default();
        let profile = if token.is_empty() {
            None
        } else {
            storage
                .get_item(PROFILE_KEY)
                .and_then(|raw| Profile::from_storage(&raw))
        };
        tracing::debug!(
            authenticated = !token.is_empty(),
            has_profile = profile.is_some(),
            "session loaded"
        );
        Self {
            state: RefCell::new(Session { token, profile }),
            storage,
        }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// `None` when unauthenticated
    pub(crate) fn token(&self) -> Option<String> {
        let state = self.state.borrow();
        (!state.token.is_empty()).then(|| state.token.clone())
    }

    pub(crate) fn profile(&self) -> Ref<'_, Option<Profile>> {
        Ref::map(self.state.borrow(), |s| &s.profile)
    }

    pub(crate) fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub(crate) fn login(
        &self,
        client: &ApiClient<'_>,
        credentials: &Credentials,
    ) -> Result<Session, AppError> {
        let data = client.send(ApiRequest::post("/auth/login").json(credentials)?)?;
        self.commit(serde_json::from_value(data)?)?;
        tracing::info!(username = %credentials.username, "logged in");
        Ok(self.snapshot())
    }

    pub(crate) fn register(
        &self,
        client: &ApiClient<'_>,
        details: &Registration,
    ) -> Result<Session, AppError> {
        let data = client.send(ApiRequest::post("/auth/register").json(details)?)?;
        self.commit(serde_json::from_value(data)?)?;
        tracing::info!(username = %details.username, "registered");
        Ok(self.snapshot())
    }

    fn commit(&self, payload: AuthPayload) -> Result<(), StorageError> {
        let profile = Profile::from_value(payload.user);
        {
            let mut state = self.state.borrow_mut();
            state.token = payload.token;
            state.profile = profile;
        }
        let state = self.state.borrow();
        self.storage.set_item(TOKEN_KEY, &state.token)?;
        self.write_profile(state.profile.as_ref())
    }

    /// Clears memory and storage; calling it again is a no-op
    pub(crate) fn logout(&self) -> Result<(), StorageError> {
        {
            let mut state = self.state.borrow_mut();
            state.token.clear();
            state.profile = None;
        }
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(PROFILE_KEY)
    }

    /// Shallow-merges into the current profile. Returns `false` when there
    /// is no profile to merge into.
    pub(crate) fn update_profile(&self, partial: &Map<String, Value>) -> Result<bool, StorageError> {
        {
            let mut state = self.state.borrow_mut();
            let Some(profile) = state.profile.as_mut() else {
                return Ok(false);
            };
            profile.merge(partial);
        }
        self.write_profile(self.state.borrow().profile.as_ref())?;
        Ok(true)
    }

    fn write_profile(&self, profile: Option<&Profile>) -> Result<(), StorageError> {
        let json = serde_json::to_string(&profile).map_err(|source| StorageError::Encode {
            key: PROFILE_KEY.to_string(),
            source,
        })?;
        self.storage.set_item(PROFILE_KEY, &json)
    }
}

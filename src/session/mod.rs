//! Session state: bearer token plus user profile

mod store;
mod types;

pub(crate) use store::SessionStore;
pub(crate) use types::{Credentials, Profile, Registration};

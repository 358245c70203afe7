//! Client-side routes and the navigation guard

mod guard;
mod routes;

pub(crate) use guard::{GuardDecision, Navigation, before_each};
pub(crate) use routes::{Route, routes};

//! DTOs shared across resources.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::UserId;

/// Query parameter selecting the acting user.
///
/// The gateway trusts the caller-supplied id; authentication lives in a
/// collaborating service in front of it.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct UserQuery {
    /// The user the request is about.
    pub user_id: UserId,
}

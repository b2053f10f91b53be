use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::{UserRecord, UserSummary};
use crate::users::services::UserUpdate;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for a partial update. Passwords cannot be changed here.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: None,
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<UserSummary> for PublicUser {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

impl From<UserRecord> for PublicUser {
    fn from(u: UserRecord) -> Self {
        UserSummary::from(u).into()
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub detail: &'static str,
}

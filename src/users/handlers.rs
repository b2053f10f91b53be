use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{DeletedResponse, PublicUser, RegisterRequest, UpdateUserRequest},
        error::AccountError,
        password::HashError,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/get-users", get(list_users))
        .route("/get-user/:id", get(get_user))
        .route("/update-user/:id", put(update_user))
        .route("/delete-user/:id", delete(delete_user))
}

/// Map a service error onto a status and a client-safe message.
fn reject(e: AccountError) -> (StatusCode, String) {
    match e {
        AccountError::Validation(v) => {
            warn!(error = %v, "rejected input");
            (StatusCode::BAD_REQUEST, v.to_string())
        }
        AccountError::DuplicateEmail => {
            warn!("email already registered");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        AccountError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        AccountError::Hashing(HashError::InputTooLong) => {
            warn!("password too long");
            (StatusCode::BAD_REQUEST, "Password too long".into())
        }
        AccountError::Hashing(_) | AccountError::Store(_) => {
            error!(error = %e, "internal failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            )
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .accounts
        .register(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(reject)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, (StatusCode, String)> {
    let users = state.accounts.list().await.map_err(reject)?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state.accounts.get_by_id(&id).await.map_err(reject)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .accounts
        .update(&id, payload.into())
        .await
        .map_err(reject)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    state.accounts.delete(&id).await.map_err(reject)?;
    Ok(Json(DeletedResponse {
        detail: "User deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{error::ValidationError, repo::StoreError};

    #[test]
    fn public_user_serialization_has_no_credentials() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn error_status_mapping() {
        let cases = [
            (
                AccountError::Validation(ValidationError::InvalidIdentifier),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::Validation(ValidationError::NoFieldsProvided),
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (AccountError::NotFound, StatusCode::NOT_FOUND),
            (
                AccountError::Hashing(HashError::InputTooLong),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(reject(err).0, status);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AccountError::Store(StoreError::Database(sqlx::Error::Configuration(
            "pg at 10.0.0.5 refused".into(),
        )));
        let (_, msg) = reject(err);
        assert!(!msg.contains("10.0.0.5"));
    }
}

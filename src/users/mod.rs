use crate::state::AppState;
use axum::Router;

mod dto;
pub mod error;
mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::{DeletedResponse, PublicUser, RegisterRequest, UpdateUserRequest};
pub use error::{AccountError, ValidationError};
pub use memory::MemoryUserStore;
pub use password::{HashError, PasswordHasher};
pub use repo::{parse_user_id, PgUserStore, StoreError, UserStore};
pub use repo_types::{NewUser, UserChanges, UserRecord, UserSummary};
pub use services::{AccountService, UserUpdate};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}

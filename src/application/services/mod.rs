//! Application services.

pub mod auth_service;
pub mod message_service;
pub mod server_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};
pub use message_service::{
    MessageError, MessageQueryDto, MessageService, MessageServiceImpl, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};
pub use server_service::{ServerError, ServerService, ServerServiceImpl};

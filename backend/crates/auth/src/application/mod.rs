//! Application Layer - Use Cases

pub mod config;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;
pub mod token;
pub mod update_profile;

pub use refresh::RefreshTokenUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::{TokenKind, TokenPair, TokenService};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};

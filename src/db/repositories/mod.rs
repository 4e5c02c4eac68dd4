pub mod push_token_repository;
pub mod secret_repository;

pub use push_token_repository::PushTokenRepository;
pub use secret_repository::SecretRepository;

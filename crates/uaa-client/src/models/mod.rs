//! Data models: tokens, claims, client registrations.

mod registration;
mod token;

pub use registration::ClientRegistration;
pub use token::{Claims, Token, token_from_header, unsafe_decode_claims};

pub(crate) use token::TokenResponse;

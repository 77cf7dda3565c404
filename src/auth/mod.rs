pub mod permissions;
pub mod principal;
pub mod token;

pub use principal::{Principal, Role};
pub use token::TokenVerifier;

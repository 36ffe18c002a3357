//! Authentication strategies for Vault.

mod approle;
mod token;
mod traits;

pub use approle::AppRoleStrategy;
pub use token::TokenStrategy;
pub use traits::AuthStrategy;

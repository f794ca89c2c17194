//! Credential wrappers and scope handling shared by the token exchange and the flow controller.

pub mod scope;
pub mod secret;
pub mod state;

pub use scope::*;
pub use secret::*;
pub use state::*;

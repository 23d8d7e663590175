//! Identity and session handling for the web desk.
//! Keep the public surface thin and split implementation across sub-modules.

mod account;
mod repository;
mod store;
mod session;

pub use account::{Account, IdentityError};
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use store::IdentityStore;
pub use session::{Session, SessionManager, SESSION_COOKIE};

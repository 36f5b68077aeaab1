//! Stores the session and access control functionality that should be shared
//! between different clients of the console
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]

#[cfg(target_arch = "wasm32")]
mod suppress_wasm_warnings {
    // Needed because we need to enable js feature on this crate
    use getrandom as _;
}

mod client;
mod guard;
mod provider;
mod session;
mod storage;

pub use client::{Client, UiCallBack};
pub use guard::{decide, RouteAccess};
pub use provider::IdentityProvider;
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, PersistedSession, SessionStorage};

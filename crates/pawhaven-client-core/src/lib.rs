//! Session and authorization core shared by the console front ends
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
mod errors;
mod gate;
mod guard;
mod session;

pub use client::{
    resolver::{Authorization, AuthorizationResolver, RoleResolution},
    Client, LoginOutcome, UiCallBack,
};
pub use errors::{ClientError, LoginError, SnapshotError, StoreError};
pub use gate::{GateState, LayoutArea, LayoutGate};
pub use guard::{authorize, GuardDecision, LandingRoute, RouteGuard};
pub use session::{
    AuthoritativeRoles, Identity, MemoryStore, Session, SessionContext, SessionGeneration,
    SessionSnapshot, SessionStore,
};

#[cfg(not(target_arch = "wasm32"))]
pub use session::FileStore;

#[cfg(target_arch = "wasm32")]
pub use session::LocalStorageStore;

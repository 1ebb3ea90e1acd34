//! Who is logged in, and the durable mirror of that information

mod context;
pub(crate) mod identity;
mod snapshot;
mod store;

pub use context::{SessionContext, SessionGeneration};
pub use identity::{AuthoritativeRoles, Identity, Session};
pub use snapshot::SessionSnapshot;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{MemoryStore, SessionStore};

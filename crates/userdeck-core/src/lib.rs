// userdeck-core: connection/fetch lifecycle controller between userdeck-api
// and consumers (CLI, or any presentation layer reading the state surface).

pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_ENDPOINT, DirectoryConfig};
pub use controller::{ConnectionState, Directory, InfoMessage};
pub use error::DirectoryError;
pub use store::UserStore;
pub use stream::UserStream;
pub use view::{DirectoryStats, SortKey, UserQuery};

// Re-export the wire model at the crate root for ergonomics.
pub use userdeck_api::{Address, Company, Geo, User};

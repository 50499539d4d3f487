pub mod compat;
pub mod error;
pub mod format;
pub mod load;
pub mod save;
pub mod store;

pub use error::{PersistError, StoreError};
pub use format::{ONBOARDING_KEY, PROJECT_KEY};
pub use load::{has_seen_onboarding, load, load_strict, LoadedProject};
pub use save::{clear, mark_onboarding_seen, save};
pub use store::{DirStore, KeyValueStore, MemoryStore};

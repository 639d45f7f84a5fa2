pub mod memory;
pub mod store;
pub mod verification;

pub use memory::InMemoryUserStore;
pub use store::{Gender, NewUser, StoreError, UserProfile, UserRecord, UserStore};
pub use verification::generate_verification_code;

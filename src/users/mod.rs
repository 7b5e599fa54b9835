pub mod filter;
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use filter::{CandidateFilter, Predicate};
pub use memory::MemoryDirectory;
pub use repo::{DirectoryError, PgUserDirectory, UserDirectory};
pub use repo_types::{Interests, NewUser, User};

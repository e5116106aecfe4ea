//! Record-store adapters.
//!
//! The durable store is an external collaborator reached only through the
//! repository ports; these in-process adapters stand in for it with
//! key-based lookup and upsert over concurrent maps. Swapping in a remote
//! store is a matter of new adapters, not domain changes.

pub mod memory_group_repository;
pub mod memory_message_repository;
pub mod memory_party_repository;
pub mod memory_user_directory;

pub use memory_group_repository::InMemoryGroupRepository;
pub use memory_message_repository::InMemoryMessageRepository;
pub use memory_party_repository::InMemoryPartyRepository;
pub use memory_user_directory::InMemoryUserDirectory;

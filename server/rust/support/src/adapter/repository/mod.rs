pub mod credential_in_memory;

pub use credential_in_memory::InMemoryCredentialStore;

pub mod factory;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod resolver;
pub mod store;
pub mod valkey;

pub use factory::build_session_store;
pub use resolver::SessionResolver;
pub use store::{Session, SessionStoreError};

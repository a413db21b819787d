//! Code issuance and binding state machine.
//!
//! [`BindingService`] is the entry point used by the HTTP routes and the chat
//! commands. It is built once from a [`CodeStore`] and a
//! [`BindingRepository`] and shared behind an `Arc`.

pub mod codes;
pub mod repository;
pub mod service;

pub use codes::{CodeStore, MemoryCodeStore};
pub use repository::BindingRepository;
pub use service::BindingService;

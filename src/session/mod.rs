//! Per-browser session management.
//!
//! Each browser gets its own [`Session`] holding one
//! [`ChatInterface`](crate::chat::ChatInterface). Sessions live in memory
//! only and are evicted after a period of inactivity.
//!
//! # Architecture
//!
//! - [`Session`]: one browser's chat interface plus activity timestamps
//! - [`SessionStore`]: thread-safe map of all active sessions
//!
//! # Example
//!
//! ```rust
//! use langrag_web::session::SessionStore;
//! use langrag_web::upload::UploadPolicy;
//!
//! let store = SessionStore::new(UploadPolicy::default());
//! let session = store.create();
//! session.with_interface(|chat| chat.set_input("Hello!"));
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(session.with_interface(|chat| chat.input().to_string()), "Hello!");
//! ```

mod store;

pub use store::{DEFAULT_SESSION_TIMEOUT, Session, SessionStore};

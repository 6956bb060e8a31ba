//! The Webmention protocols.
//!
//! - [`resolve`] — endpoint discovery for a target URL.
//! - [`validate`] — confirm that a source page references a target.
//! - [`receive`] — the receiver state machine: validate, record, invalidate.
//! - [`send`] — the sender: discover, notify, record the endpoint's answer.
//!
//! Every operation is one-shot and request-scoped; nothing is cached between
//! calls. Persistence goes through [`backlink_core::store::MentionStore`] and
//! the network through [`Fetcher`].

pub mod error;
pub mod fetch;
pub mod local;
pub mod receive;
pub mod resolve;
pub mod send;
pub mod validate;

pub use error::{Error, Result};
pub use fetch::{Fetcher, FetcherConfig};
pub use local::RouteTable;
pub use receive::{ReceiveOutcome, receive};
pub use resolve::resolve_endpoint;
pub use send::{SendOutcome, send, send_all};
pub use validate::validate_source;

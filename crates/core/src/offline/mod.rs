//! Client-side offline mutation queue.
//!
//! When a write fails for lack of connectivity, the client wraps it as
//! a `QueuedMutation` and parks it here. A reconnect event triggers a
//! sequential drain through an injected dispatcher; failed entries are
//! retained (never silently dropped) while later entries still get
//! their attempt. Conflict resolution is deliberately absent: a replay
//! against a resource that changed server-side fails with the domain
//! error, which stays on the entry for the user to see.
//!
//! # Modules
//!
//! - `types` - Queued mutations and drain reporting
//! - `error` - Replay failure classification
//! - `queue` - The FIFO queue and drain loop

pub mod error;
pub mod queue;
pub mod types;

pub use error::ReplayError;
pub use queue::MutationQueue;
pub use types::{DrainOutcome, Method, QueuedMutation};

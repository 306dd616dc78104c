//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain ports to fulfill use cases.
//! It's responsible for:
//! - Driving a ring request through resolution and call start
//! - Scheduling and supervising the deferred cancellation

pub mod auto_terminator;
pub mod ring;

pub use auto_terminator::{AutoTerminator, RING_DURATION};
pub use ring::{RingReceipt, RingService};

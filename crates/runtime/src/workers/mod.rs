//! Background tasks that back the engine.
//!
//! The flush worker periodically writes cooldown state through to its
//! repository; the sweep worker reclaims expired entries across all three
//! trackers. Both communicate with the shared stores only through their
//! atomic operations and shut down gracefully on command.

pub(crate) mod flush;
pub(crate) mod sweep;

pub use flush::FlushWorker;
pub use sweep::{SweepReport, SweepWorker};

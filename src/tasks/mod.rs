//! Background Tasks Module
//!
//! Contains the background task that runs for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Sweeper: Removes expired cache entries at a fixed interval

mod sweeper;

pub(crate) use sweeper::{spawn_sweeper, SweeperHandle};

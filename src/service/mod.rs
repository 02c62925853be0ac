// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the binder.
//!
//! This module contains [`ConfigBinder`], which routes change events and namespace
//! snapshots into a bound configuration, the poll coordinator driving the initial
//! load of every tracked namespace, and group registration.

pub mod config_binder;
pub mod group;
pub mod poll;

// Re-export commonly used types
pub use config_binder::{ConfigBinder, ConfigBinderBuilder};
pub use group::{
    register_group, BoundConfiguration, ConfigurationGroup, GroupMembers, PollFuture,
    RegisteredGroup,
};
pub use poll::NamespacePoll;

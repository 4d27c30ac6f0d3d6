#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod error;
pub mod rtm;
pub mod ws;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Default interval between heartbeat pings, in seconds.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

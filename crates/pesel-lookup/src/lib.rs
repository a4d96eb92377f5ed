#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;


pub use crate::config::{ServiceArgs, ServiceConfig};
pub use crate::error::{Result, ServiceError};
pub use crate::service::handler::{Lookup, LookupService, Outcome, Reply};
pub use crate::service::streaming::request::Job;
pub use crate::telemetry::{ServiceStats, StatsSnapshot, init_telemetry};
pub use pesel;

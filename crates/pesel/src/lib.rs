#![doc = include_str!("../README.md")]

mod century;
mod checksum;
mod date;
mod decode;
mod enumerate;
mod error;
mod id;
mod request;
mod search;
#[cfg(feature = "serde")]
mod serde;

#[cfg(test)]
mod tests;

pub use crate::century::*;
pub use crate::checksum::*;
pub use crate::date::*;
pub use crate::decode::*;
pub use crate::enumerate::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::request::*;
pub use crate::search::*;

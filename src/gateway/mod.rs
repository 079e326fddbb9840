//! Generation facade

mod builder;
mod client;

pub use builder::{Bragi, BragiBuilder};
pub use client::{BragiClient, Generation};

//! Queue service backends.
//!
//! This module contains concrete implementations of the `SqsApi` trait.

pub mod aws;
pub mod memory;

pub use aws::AwsSqsApi;
pub use memory::InMemorySqsApi;

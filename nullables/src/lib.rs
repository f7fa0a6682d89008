//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the workers (clock, network, key generation) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic, programmable values
//! - Record what was asked of them for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod keysource;
pub mod network;

pub use clock::NullClock;
pub use keysource::NullAccountSource;
pub use network::NullNetwork;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     AppOptions → plugins → middleware → routes → frozen registrar
//!
//! Shutdown (shutdown.rs):
//!     close() / signal → stop accepting → drain in-flight → port/url reset
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → trigger graceful shutdown (CLI only)
//! ```
//!
//! # Design Decisions
//! - Registration finishes synchronously before any listener starts
//! - The router is immutable once built; nothing registers after shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build, AppOptions};

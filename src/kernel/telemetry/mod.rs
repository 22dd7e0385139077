//! Simulator telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (Reactor or its state machines).
//! It exists solely for observability and verification.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain transcript text, incident quotes or
//! generated notification text. Only enums, ticks, counts and numeric deltas.

pub mod event;
pub mod metrics;
pub mod recorder;

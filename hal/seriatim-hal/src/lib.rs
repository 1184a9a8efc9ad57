//! Seriatim Hardware Abstraction Layer
//!
//! This crate defines the hardware contract the link engine builds on. A
//! chip-specific implementation (STM32, RP2040, a host-side mock, ...)
//! provides the two single-byte operations and the receive cell; the engine
//! never touches registers itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Link engine (seriatim-core)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  seriatim-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip-specific│       │  host-side    │
//! │  UART driver  │       │  test double  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPort`] - interrupt-driven single-byte serial I/O

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

// Re-export key traits at crate root for convenience
pub use serial::{Parity, SerialConfig, SerialPort, StopBits};

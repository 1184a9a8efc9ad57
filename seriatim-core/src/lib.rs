//! Hardware-agnostic link engine for the Seriatim serial protocol
//!
//! This crate ties the wire protocol to a serial port: bytes delivered by
//! the hardware's receive-complete notification are queued, reassembled
//! into frames one byte per update cycle, and dispatched to registered
//! handlers; outbound bytes are queued and transmitted one at a time,
//! driven by transmit-complete notifications.
//!
//! # Components
//!
//! - [`queue::ByteQueue`] - bounded FIFO between notification and update
//!   contexts
//! - [`registry::CallbackRegistry`] - append-only id-to-handler mapping
//! - [`link::Link`] - the coordinator owning queues, assembler, and registry
//! - [`shared::SharedLink`] - critical-section wrapper for sharing a link
//!   between interrupt handlers and the main loop
//!
//! # Execution model
//!
//! Nothing in this crate blocks or waits. [`link::Link::update`] is meant
//! to be called from an unbounded main loop and processes at most one
//! inbound byte per call; `on_receive_complete` / `on_transmit_complete`
//! are invoked from interrupt context and only move single bytes between
//! the hardware and the queues. Absence of data and full queues are
//! reported as status codes, never awaited.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod link;
pub mod queue;
pub mod registry;
pub mod shared;

pub use link::{Link, LinkConfig, LinkError};
pub use queue::{ByteQueue, QueueError};
pub use registry::{CallbackRegistry, FrameHandler, RegistryError};
pub use shared::SharedLink;

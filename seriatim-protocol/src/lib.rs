//! Seriatim Wire Protocol
//!
//! This crate defines the byte-level frame format carried over a single
//! full-duplex serial link, and the state machine that reassembles frames
//! from a stream arriving one byte at a time.
//!
//! # Wire format
//!
//! ```text
//! ┌───────┬────┬─────┬─────────────┐
//! │ START │ ID │ LEN │ PAYLOAD     │
//! │ 1B    │ 1B │ 1B  │ 0–255B      │
//! └───────┴────┴─────┴─────────────┘
//! ```
//!
//! There is no terminator, checksum, or escaping: once a start symbol is
//! observed the stream is trusted. A misaligned stream recovers at the next
//! start symbol, which aborts any frame in progress and begins a fresh one
//! (see [`FrameAssembler`]).
//!
//! The start symbol is configuration, not a fixed wire value; both ends of
//! a link simply have to agree on it.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;

pub use frame::{
    FeedEvent, Frame, FrameAssembler, FrameError, FrameState, DEFAULT_START_SYMBOL,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, WIRE_OVERHEAD,
};

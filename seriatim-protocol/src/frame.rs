//! Frame encoding and single-byte frame assembly.
//!
//! Frame format:
//! - START (1 byte): synchronization byte, configurable per link
//! - ID (1 byte): frame identifier, used for handler dispatch
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (0-255 bytes): identifier-specific data

use heapless::Vec;

/// Start symbol used when a link does not configure its own
pub const DEFAULT_START_SYMBOL: u8 = 0xAA;

/// Maximum payload size in bytes
///
/// The declared length travels as a single byte, so every declarable length
/// fits the inline buffer and payload storage can never be exhausted.
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Bytes of framing around a payload (START + ID + LENGTH)
pub const WIRE_OVERHEAD: usize = 3;

/// Maximum complete frame size (START + ID + LENGTH + MAX_PAYLOAD)
pub const MAX_FRAME_SIZE: usize = WIRE_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame assembly or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// A byte arrived in a state the assembler cannot accept
    ///
    /// Only reachable when a completed frame is left unclaimed and the
    /// stream keeps flowing; a dispatcher that takes every completed frame
    /// before feeding further bytes never sees this.
    UnknownData,
}

/// A complete protocol unit: identifier plus payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Frame identifier
    pub id: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given identifier and payload
    pub fn new(id: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            id,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(id: u8) -> Self {
        Self {
            id,
            payload: Vec::new(),
        }
    }

    /// Declared payload length
    pub fn len(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Returns true if the frame carries no payload
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        WIRE_OVERHEAD + self.payload.len()
    }

    /// Encode this frame into a byte buffer using the given start symbol
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8], start_symbol: u8) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = start_symbol;
        buffer[1] = self.id;
        buffer[2] = self.len();
        buffer[3..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }
}

/// Assembly progress of the in-flight frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameState {
    /// No frame in progress; non-start bytes are ignored
    Empty,
    /// Start symbol seen, next byte is the identifier
    AwaitingId,
    /// Identifier seen, next byte is the declared payload length
    AwaitingLength,
    /// Accumulating payload bytes
    AwaitingPayload,
    /// Frame finished; waiting to be claimed via [`FrameAssembler::take_frame`]
    Complete,
}

/// What a single fed byte did to the assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedEvent {
    /// Byte consumed (or ignored as noise); no boundary crossed
    Pending,
    /// An identifier byte was just accepted for a new frame
    ///
    /// Dispatchers bind their handler here, before the payload arrives.
    Id(u8),
    /// A start symbol aborted an in-progress frame and began a new one
    Restarted,
    /// The frame completed; claim it with [`FrameAssembler::take_frame`]
    Complete,
}

/// State machine reassembling frames from a one-byte-at-a-time stream
///
/// The assembler holds exactly one frame in progress. A start symbol always
/// begins a new frame, discarding any partial one (resynchronization); any
/// other byte is interpreted according to the current [`FrameState`].
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    start_symbol: u8,
    state: FrameState,
    id: u8,
    declared_len: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_START_SYMBOL)
    }
}

impl FrameAssembler {
    /// Create an assembler synchronizing on the given start symbol
    pub fn new(start_symbol: u8) -> Self {
        Self {
            start_symbol,
            state: FrameState::Empty,
            id: 0,
            declared_len: 0,
            payload: Vec::new(),
        }
    }

    /// The start symbol this assembler synchronizes on
    pub fn start_symbol(&self) -> u8 {
        self.start_symbol
    }

    /// Current assembly state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Discard any frame in progress and return to [`FrameState::Empty`]
    pub fn reset(&mut self) {
        self.state = FrameState::Empty;
        self.id = 0;
        self.declared_len = 0;
        self.payload.clear();
    }

    /// Feed a single byte to the assembler
    ///
    /// A byte equal to the start symbol always restarts assembly, wherever
    /// it appears: there is no escaping, so a payload cannot carry the
    /// start symbol value. Every other byte advances the current frame.
    pub fn feed(&mut self, byte: u8) -> Result<FeedEvent, FrameError> {
        if byte == self.start_symbol {
            let interrupted = self.state != FrameState::Empty;
            self.reset();
            self.state = FrameState::AwaitingId;
            return Ok(if interrupted {
                FeedEvent::Restarted
            } else {
                FeedEvent::Pending
            });
        }

        match self.state {
            // Noise between frames is ignored; resynchronization happens
            // on the next start symbol.
            FrameState::Empty => Ok(FeedEvent::Pending),
            FrameState::AwaitingId => {
                self.id = byte;
                self.state = FrameState::AwaitingLength;
                Ok(FeedEvent::Id(byte))
            }
            FrameState::AwaitingLength => {
                self.declared_len = byte;
                self.payload.clear();
                self.state = FrameState::AwaitingPayload;
                // A zero-length frame needs no further bytes and completes
                // on this same call.
                if self.declared_len == 0 {
                    self.state = FrameState::Complete;
                    Ok(FeedEvent::Complete)
                } else {
                    Ok(FeedEvent::Pending)
                }
            }
            FrameState::AwaitingPayload => {
                // declared_len <= MAX_PAYLOAD_SIZE, so this cannot overflow
                let _ = self.payload.push(byte);
                if self.payload.len() == self.declared_len as usize {
                    self.state = FrameState::Complete;
                    Ok(FeedEvent::Complete)
                } else {
                    Ok(FeedEvent::Pending)
                }
            }
            FrameState::Complete => Err(FrameError::UnknownData),
        }
    }

    /// Claim the completed frame, resetting the assembler to [`FrameState::Empty`]
    ///
    /// Returns `None` unless assembly is in [`FrameState::Complete`].
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.state != FrameState::Complete {
            return None;
        }
        let frame = Frame {
            id: self.id,
            payload: self.payload.clone(),
        };
        self.reset();
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const START: u8 = DEFAULT_START_SYMBOL;

    fn feed_all(assembler: &mut FrameAssembler, bytes: &[u8]) -> Option<Frame> {
        for &byte in bytes {
            if let Ok(FeedEvent::Complete) = assembler.feed(byte) {
                return assembler.take_frame();
            }
        }
        None
    }

    #[test]
    fn test_assemble_frame_with_payload() {
        let mut assembler = FrameAssembler::new(START);

        assert_eq!(assembler.feed(START), Ok(FeedEvent::Pending));
        assert_eq!(assembler.state(), FrameState::AwaitingId);
        assert_eq!(assembler.feed(0x42), Ok(FeedEvent::Id(0x42)));
        assert_eq!(assembler.feed(3), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x01), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x02), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x03), Ok(FeedEvent::Complete));

        let frame = assembler.take_frame().unwrap();
        assert_eq!(frame.id, 0x42);
        assert_eq!(frame.payload.as_slice(), &[0x01, 0x02, 0x03]);
        assert_eq!(assembler.state(), FrameState::Empty);
    }

    #[test]
    fn test_zero_length_completes_without_further_bytes() {
        let mut assembler = FrameAssembler::new(START);

        assert_eq!(assembler.feed(START), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x10), Ok(FeedEvent::Id(0x10)));
        assert_eq!(assembler.feed(0), Ok(FeedEvent::Complete));

        let frame = assembler.take_frame().unwrap();
        assert_eq!(frame.id, 0x10);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_noise_ignored_while_empty() {
        let mut assembler = FrameAssembler::new(START);

        for byte in [0x00, 0xFF, 0x12, 0x34] {
            assert_eq!(assembler.feed(byte), Ok(FeedEvent::Pending));
            assert_eq!(assembler.state(), FrameState::Empty);
        }

        // A frame after the garbage still parses
        let frame = feed_all(&mut assembler, &[START, 0x24, 0]).unwrap();
        assert_eq!(frame.id, 0x24);
    }

    #[test]
    fn test_start_symbol_resyncs_mid_frame() {
        // Start symbol distinct from the payload byte so only the fifth
        // byte restarts assembly
        let mut assembler = FrameAssembler::new(0x7E);

        assert_eq!(assembler.feed(0x7E), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x11), Ok(FeedEvent::Id(0x11)));
        assert_eq!(assembler.feed(5), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0xAA), Ok(FeedEvent::Pending));
        // Partial frame (1 of 5 payload bytes) is discarded here
        assert_eq!(assembler.feed(0x7E), Ok(FeedEvent::Restarted));

        assert_eq!(assembler.feed(0x12), Ok(FeedEvent::Id(0x12)));
        assert_eq!(assembler.feed(0), Ok(FeedEvent::Complete));

        let frame = assembler.take_frame().unwrap();
        assert_eq!(frame.id, 0x12);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_unclaimed_complete_frame_rejects_data() {
        let mut assembler = FrameAssembler::new(START);

        assert_eq!(assembler.feed(START), Ok(FeedEvent::Pending));
        assert_eq!(assembler.feed(0x01), Ok(FeedEvent::Id(0x01)));
        assert_eq!(assembler.feed(0), Ok(FeedEvent::Complete));

        // Frame not taken; a further data byte is the defensive branch
        assert_eq!(assembler.feed(0x55), Err(FrameError::UnknownData));

        // A start symbol still recovers, discarding the unclaimed frame
        assert_eq!(assembler.feed(START), Ok(FeedEvent::Restarted));
        assert_eq!(assembler.state(), FrameState::AwaitingId);
    }

    #[test]
    fn test_take_frame_only_when_complete() {
        let mut assembler = FrameAssembler::new(START);
        assert!(assembler.take_frame().is_none());

        assembler.feed(START).unwrap();
        assembler.feed(0x42).unwrap();
        assert!(assembler.take_frame().is_none());
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::empty(0x20);
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer, START).unwrap();

        assert_eq!(len, 3);
        assert_eq!(&buffer[..len], &[START, 0x20, 0]);
    }

    #[test]
    fn test_encode_roundtrip() {
        let original = Frame::new(0x21, &[1, 2, 3, 4, 5]).unwrap();
        let mut buffer = [0u8; 16];
        let len = original.encode(&mut buffer, START).unwrap();
        assert_eq!(len, 8);

        let mut assembler = FrameAssembler::new(START);
        let parsed = feed_all(&mut assembler, &buffer[..len]).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x21, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 5];
        assert_eq!(
            frame.encode(&mut buffer, START),
            Err(FrameError::BufferTooSmall)
        );
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(0x21, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    proptest! {
        /// Garbage that never contains the start symbol cannot disturb a
        /// following frame.
        #[test]
        fn prop_frame_survives_leading_garbage(
            garbage in proptest::collection::vec(
                (0u8..=0xFF).prop_filter("not the start symbol", |b| *b != START),
                0..64,
            ),
            // An id equal to the start symbol would itself resynchronize;
            // this wire has no escaping.
            id in (0u8..=0xFF).prop_filter("not the start symbol", |b| *b != START),
            payload in proptest::collection::vec(
                (0u8..=0xFF).prop_filter("not the start symbol", |b| *b != START),
                0..32,
            ),
        ) {
            let mut assembler = FrameAssembler::new(START);
            for &byte in &garbage {
                prop_assert_eq!(assembler.feed(byte), Ok(FeedEvent::Pending));
            }

            let frame = Frame::new(id, &payload).unwrap();
            let mut buffer = [0u8; MAX_FRAME_SIZE];
            let len = frame.encode(&mut buffer, START).unwrap();

            let parsed = feed_all(&mut assembler, &buffer[..len]).unwrap();
            prop_assert_eq!(parsed.id, id);
            prop_assert_eq!(parsed.payload.as_slice(), payload.as_slice());
        }

        /// Feeding arbitrary bytes never breaks the accumulation invariant,
        /// provided completed frames are claimed as they appear.
        #[test]
        fn prop_arbitrary_stream_keeps_invariants(
            bytes in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let mut assembler = FrameAssembler::new(START);
            for &byte in &bytes {
                match assembler.feed(byte) {
                    Ok(FeedEvent::Complete) => {
                        let frame = assembler.take_frame().unwrap();
                        prop_assert!(frame.payload.len() <= MAX_PAYLOAD_SIZE);
                        prop_assert_eq!(assembler.state(), FrameState::Empty);
                    }
                    Ok(_) => {}
                    Err(e) => prop_assert_eq!(e, FrameError::UnknownData),
                }
            }
        }
    }
}

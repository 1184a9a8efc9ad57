//! Link coordinator
//!
//! Owns the inbound and outbound byte queues, the frame assembler, and the
//! handler registry, and wires them to a [`SerialPort`]. The hardware layer
//! calls the two notification entry points; the host's main loop calls
//! [`Link::update`] repeatedly. Nothing here blocks.

use core::fmt;

use seriatim_hal::SerialPort;
use seriatim_protocol::{
    FeedEvent, Frame, FrameAssembler, FrameState, DEFAULT_START_SYMBOL, MAX_FRAME_SIZE,
};

use crate::queue::ByteQueue;
use crate::registry::{CallbackRegistry, FrameHandler};

/// Link configuration
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    /// Byte value marking the start of a frame
    pub start_symbol: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            start_symbol: DEFAULT_START_SYMBOL,
        }
    }
}

/// Errors surfaced by link operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Arming a receive or starting a transmit failed
    Hardware(E),
    /// A queue was full; the byte (or frame) was discarded
    Overrun,
    /// The handler registry is at capacity
    RegistryFull,
    /// A byte arrived in a state the assembler cannot accept (defensive)
    UnknownData,
}

/// Coordinator for one full-duplex serial link
///
/// `QN` sizes both byte queues; `CN` bounds the number of registered
/// handlers. The `'h` lifetime ties registered handler borrows to the link.
///
/// The three entry-point groups must not interleave mid-operation: the two
/// notifications run in interrupt context while `update` runs in the main
/// loop. Single-context embedders (and tests) may call everything on `&mut
/// self` directly; anything crossing an interrupt boundary goes through
/// [`SharedLink`](crate::shared::SharedLink).
pub struct Link<'h, P: SerialPort, const QN: usize, const CN: usize> {
    port: P,
    assembler: FrameAssembler,
    inbound: ByteQueue<QN>,
    outbound: ByteQueue<QN>,
    callbacks: CallbackRegistry<'h, CN>,
    /// Registry slot bound when the current frame's id byte arrived
    bound: Option<usize>,
    /// True while an outbound byte is physically in flight
    transmitting: bool,
}

impl<'h, P: SerialPort, const QN: usize, const CN: usize> Link<'h, P, QN, CN> {
    /// Construct a link and arm the first one-byte reception
    ///
    /// Every successful reception re-arms the next one from
    /// [`on_receive_complete`](Self::on_receive_complete); this first arm
    /// starts the chain.
    pub fn new(port: P, config: LinkConfig) -> Result<Self, LinkError<P::Error>> {
        let mut link = Self {
            port,
            assembler: FrameAssembler::new(config.start_symbol),
            inbound: ByteQueue::new(),
            outbound: ByteQueue::new(),
            callbacks: CallbackRegistry::new(),
            bound: None,
            transmitting: false,
        };
        link.port.receive_one().map_err(LinkError::Hardware)?;
        Ok(link)
    }

    /// Register a handler for a frame identifier
    ///
    /// First registration for an identifier wins; see
    /// [`CallbackRegistry`](crate::registry::CallbackRegistry).
    pub fn register_handler(
        &mut self,
        id: u8,
        handler: &'h mut dyn FrameHandler,
    ) -> Result<(), LinkError<P::Error>> {
        self.callbacks
            .register(id, handler)
            .map_err(|_| LinkError::RegistryFull)
    }

    /// Receive-complete notification
    ///
    /// Called from interrupt context when one byte has landed in the port's
    /// receive cell. Queues the byte and re-arms the next reception. The
    /// next reception is armed even when the queue rejected the byte - a
    /// stalled receive chain would silence the link for good, a dropped
    /// byte only loses one frame.
    pub fn on_receive_complete(&mut self) -> Result<(), LinkError<P::Error>> {
        let byte = self.port.received_byte();
        let dropped = self.inbound.enqueue(byte).is_err();

        self.port.receive_one().map_err(LinkError::Hardware)?;

        if dropped {
            Err(LinkError::Overrun)
        } else {
            Ok(())
        }
    }

    /// Transmit-complete notification
    ///
    /// Called from interrupt context when the in-flight byte has finished
    /// transmitting. Starts the next queued byte, or idles the transmit
    /// chain when the queue is empty; [`update`](Self::update) restarts it
    /// once new output is queued.
    pub fn on_transmit_complete(&mut self) -> Result<(), LinkError<P::Error>> {
        match self.outbound.dequeue() {
            Ok(byte) => self.port.transmit_one(byte).map_err(LinkError::Hardware),
            Err(_) => {
                self.transmitting = false;
                Ok(())
            }
        }
    }

    /// Append one byte to the outbound queue
    ///
    /// Does not start transmission; the next [`update`](Self::update) does.
    pub fn enqueue_output(&mut self, byte: u8) -> Result<(), LinkError<P::Error>> {
        self.outbound.enqueue(byte).map_err(|_| LinkError::Overrun)
    }

    /// Queue a whole frame for transmission
    ///
    /// The frame is admitted only if the outbound queue has room for its
    /// complete encoding, so a torn frame never reaches the wire.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), LinkError<P::Error>> {
        if self.outbound.remaining() < frame.encoded_len() {
            return Err(LinkError::Overrun);
        }

        let mut buffer = [0u8; MAX_FRAME_SIZE];
        // Cannot fail: the buffer fits any frame
        let len = frame
            .encode(&mut buffer, self.assembler.start_symbol())
            .map_err(|_| LinkError::Overrun)?;

        for &byte in &buffer[..len] {
            // Admission was checked above
            let _ = self.outbound.enqueue(byte);
        }
        Ok(())
    }

    /// One cooperative update cycle
    ///
    /// Dequeues at most one inbound byte and feeds the assembler, binding
    /// the handler as soon as the identifier arrives; dispatches a
    /// completed frame; and kicks the transmit chain if output is queued
    /// and nothing is in flight. Frame assembly is therefore paced by how
    /// often the main loop calls this.
    pub fn update(&mut self) -> Result<(), LinkError<P::Error>> {
        if let Ok(byte) = self.inbound.dequeue() {
            match self.assembler.feed(byte) {
                Ok(FeedEvent::Id(id)) => self.bound = self.callbacks.find(id),
                Ok(FeedEvent::Restarted) => self.bound = None,
                Ok(FeedEvent::Pending) | Ok(FeedEvent::Complete) => {}
                Err(_) => return Err(LinkError::UnknownData),
            }
        }

        if let Some(frame) = self.assembler.take_frame() {
            // An unmatched id still consumed its whole frame; the stream
            // stays aligned and the payload is simply dropped.
            if let Some(slot) = self.bound.take() {
                self.callbacks.invoke(slot, frame.len(), &frame.payload);
            }
        }

        if !self.transmitting && !self.outbound.is_empty() {
            // Only the first byte is started here; the rest of the frame
            // rides the transmit-complete chain.
            self.transmitting = true;
            self.on_transmit_complete()?;
        }

        Ok(())
    }

    /// Orderly teardown
    ///
    /// Drains both queues, drops all registrations, and resets assembly
    /// and the transmit chain. The port is left as-is.
    pub fn clean(&mut self) {
        self.inbound.drain();
        self.outbound.drain();
        self.callbacks.clear();
        self.assembler.reset();
        self.bound = None;
        self.transmitting = false;
    }

    /// True while an outbound byte is physically in flight
    pub fn transmission_in_flight(&self) -> bool {
        self.transmitting
    }

    /// Bytes waiting in the inbound queue
    pub fn pending_input(&self) -> usize {
        self.inbound.len()
    }

    /// Bytes waiting in the outbound queue
    pub fn pending_output(&self) -> usize {
        self.outbound.len()
    }

    /// Assembly state of the in-progress frame
    pub fn frame_state(&self) -> FrameState {
        self.assembler.state()
    }

    /// Access the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

/// Text output path
///
/// Queues characters for transmission, translating `\n` to `\r\n` for
/// terminal compatibility. Output starts flowing on the next
/// [`Link::update`]. A full outbound queue surfaces as `fmt::Error`.
impl<'h, P: SerialPort, const QN: usize, const CN: usize> fmt::Write for Link<'h, P, QN, CN> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if byte == b'\n' {
                self.outbound.enqueue(b'\r').map_err(|_| fmt::Error)?;
            }
            self.outbound.enqueue(byte).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

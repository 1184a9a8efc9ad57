//! Interrupt-driven serial port abstraction
//!
//! The link engine moves exactly one byte per hardware operation. A port
//! implementation arms the peripheral and returns immediately; the
//! interrupt handler reports completion back to the engine. Nothing here
//! blocks.

/// A full-duplex serial port operated one byte at a time.
///
/// Both operations are "start and return": they kick off the transfer and
/// the peripheral signals completion asynchronously (typically from an
/// interrupt handler, which then calls into the link engine's
/// `on_receive_complete` / `on_transmit_complete` entry points).
pub trait SerialPort {
    /// Error type for receive/transmit operations
    type Error;

    /// Arm reception of exactly one byte into the port's receive cell.
    ///
    /// Completion is reported through the receive-complete notification;
    /// the received value is then available from [`received_byte`].
    ///
    /// [`received_byte`]: SerialPort::received_byte
    fn receive_one(&mut self) -> Result<(), Self::Error>;

    /// Start transmitting one byte.
    ///
    /// Completion is reported through the transmit-complete notification.
    fn transmit_one(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Read the most recently received byte from the hardware receive cell.
    ///
    /// Only meaningful after a receive-complete notification and before the
    /// next one-byte reception lands.
    fn received_byte(&self) -> u8;
}

/// Serial line configuration
///
/// The engine frames data in whole octets, so the word size is fixed at
/// eight data bits; only line parameters that vary between deployments are
/// exposed.
#[derive(Debug, Clone, Copy)]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

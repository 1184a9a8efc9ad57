//! Sharing a link between interrupt handlers and the main loop
//!
//! [`Link`](crate::link::Link) itself is synchronization-free: its queues
//! must not be touched from two contexts at once. `SharedLink` provides the
//! required discipline by running every entry point inside a critical
//! section, which on single-core targets is exactly "disable interrupts for
//! the duration of the queue operation". Notification entry points called
//! from interrupt handlers and `update` called from the main loop can then
//! target the same instance safely.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use seriatim_hal::SerialPort;

use crate::link::{Link, LinkError};

/// Critical-section wrapper around a [`Link`]
///
/// All methods take `&self`, so a `SharedLink` can live in a `static` and
/// be referenced from interrupt handlers. Register handlers on the `Link`
/// before wrapping it: registration borrows the handler for the link's
/// whole lifetime, which a short-lived [`with`](Self::with) closure cannot
/// provide.
///
/// Callbacks registered with the link run while the critical section is
/// held; they must not call back into the same `SharedLink`.
pub struct SharedLink<'h, P: SerialPort, const QN: usize, const CN: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Link<'h, P, QN, CN>>>,
}

impl<'h, P: SerialPort, const QN: usize, const CN: usize> SharedLink<'h, P, QN, CN> {
    /// Wrap an already-constructed link
    pub fn new(link: Link<'h, P, QN, CN>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(link)),
        }
    }

    /// Run `f` with exclusive access to the link
    ///
    /// General escape hatch for registration, frame sending, and
    /// inspection; the closure runs inside the critical section, so keep it
    /// short.
    pub fn with<R>(&self, f: impl FnOnce(&mut Link<'h, P, QN, CN>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Receive-complete notification; see [`Link::on_receive_complete`]
    pub fn on_receive_complete(&self) -> Result<(), LinkError<P::Error>> {
        self.with(|link| link.on_receive_complete())
    }

    /// Transmit-complete notification; see [`Link::on_transmit_complete`]
    pub fn on_transmit_complete(&self) -> Result<(), LinkError<P::Error>> {
        self.with(|link| link.on_transmit_complete())
    }

    /// One cooperative update cycle; see [`Link::update`]
    pub fn update(&self) -> Result<(), LinkError<P::Error>> {
        self.with(|link| link.update())
    }

    /// Append one byte to the outbound queue; see [`Link::enqueue_output`]
    pub fn enqueue_output(&self, byte: u8) -> Result<(), LinkError<P::Error>> {
        self.with(|link| link.enqueue_output(byte))
    }
}

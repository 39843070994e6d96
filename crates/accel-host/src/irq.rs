use bitflags::bitflags;

bitflags! {
    /// Flags passed to [`HostBus::request_irq`](crate::HostBus::request_irq).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct IrqFlags: u32 {
        /// The line may be shared with other devices; every handler on it is
        /// invoked per signal and must report whether it claimed the signal.
        const SHARED = 1 << 0;
    }
}

/// Outcome of one handler invocation on a (possibly shared) line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IrqVerdict {
    /// The signal belonged to this device and was acknowledged.
    Handled,
    /// Not ours; the host runtime keeps forwarding to the line's other
    /// handlers.
    NotHandled,
}

/// An interrupt capability registered with the host runtime.
///
/// Invoked asynchronously with respect to everything else the driver does,
/// potentially before the driver has finished constructing its per-device
/// state. Implementations must not block and must not allocate; any state
/// they touch has to be safe to read from interrupt context (atomics, not
/// the locks used by probe/remove).
pub trait IrqHandler: Send + Sync {
    fn handle_interrupt(&self, line: u32) -> IrqVerdict;
}

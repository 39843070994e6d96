use crate::bus::{DeviceHandle, HostBus};
use crate::id::DeviceIdTable;

/// Declarative module metadata handed through to the host runtime's module
/// registry at registration time. The host stores it verbatim; nothing in
/// the lifecycle core interprets it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModuleMetadata {
    pub license: &'static str,
    pub author: &'static str,
    pub description: &'static str,
}

/// The driver half of the host runtime's device-model contract.
///
/// The host runtime consults [`id_table`](PciDriver::id_table) when a device
/// appears and calls [`probe`](PciDriver::probe) only on a match. For a given
/// device, `probe` and `remove` are serialized and `remove` is called exactly
/// once, after the one successful probe; distinct devices may be probed
/// concurrently, so implementations must not share mutable state across
/// devices beyond what they synchronize themselves.
pub trait PciDriver {
    /// Error type surfaced to the host runtime when a probe fails.
    type Error: std::error::Error;

    fn id_table(&self) -> DeviceIdTable;

    fn metadata(&self) -> ModuleMetadata;

    /// Bind a newly discovered matching device. On failure the driver must
    /// have released everything it acquired before returning.
    fn probe(&self, host: &mut dyn HostBus, dev: DeviceHandle) -> Result<(), Self::Error>;

    /// Release a previously probed device.
    fn remove(&self, host: &mut dyn HostBus, dev: DeviceHandle);
}

use std::sync::Arc;

use thiserror::Error;

use crate::irq::{IrqFlags, IrqHandler};

/// Opaque per-device key minted by the host runtime when a device is
/// discovered. Drivers treat it as an index into their own bookkeeping and
/// never interpret the value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Host-unique identity of a live mapping. Release calls must hand back the
/// token produced at map time; the host runtime uses it to find the mapping,
/// so a recomputed or guessed token is a contract violation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct MapToken(pub u64);

/// A virtual mapping over one of the device's address regions.
///
/// Two mappings may alias the same physical range (the MMIO and
/// write-combined views of region 0 do exactly that); they remain distinct
/// mappings with distinct tokens and must be released independently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MmioMapping {
    pub token: MapToken,
    /// Virtual base address of the mapping.
    pub base: u64,
    pub len: u64,
    /// True for the relaxed-ordering bulk-write alias.
    pub write_combined: bool,
}

/// A DMA-coherent allocation: one physical buffer with a CPU-visible address
/// and the bus address the device uses for it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DmaBuffer {
    pub cpu_addr: u64,
    pub bus_addr: u64,
    pub len: usize,
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum EnableError {
    #[error("device did not respond to power-up")]
    Unresponsive,
    #[error("host bridge refused bus mastering")]
    BusMasterDenied,
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum RegionConflictError {
    #[error("address regions already held by '{owner}'")]
    Held { owner: &'static str },
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum MapError {
    #[error("region {index} is absent or not mappable")]
    BadRegion { index: u8 },
    #[error("out of virtual address space")]
    AddressSpaceExhausted,
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    #[error("coherent allocation of {len} bytes failed")]
    OutOfMemory { len: usize },
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum IrqError {
    #[error("interrupt line {line} is unavailable")]
    LineUnavailable { line: u32 },
    #[error("existing handlers on the line do not allow sharing")]
    SharingMismatch,
}

/// The host runtime's device-model primitives, as seen by a driver.
///
/// Acquisition primitives each fail with the error type of the probe step
/// they back. Release primitives are infallible: a stored handle that the
/// host cannot resolve at release time is outside the recovery model, and the
/// host runtime treats it as fatal on its side of the seam.
pub trait HostBus {
    fn enable_device(&mut self, dev: DeviceHandle) -> Result<(), EnableError>;

    /// Reserve all of the device's address regions exclusively for `owner`
    /// (the driver name, used for diagnostics on conflict).
    fn request_regions(
        &mut self,
        dev: DeviceHandle,
        owner: &'static str,
    ) -> Result<(), RegionConflictError>;

    /// Map region `index` non-cacheable for register access.
    fn map_bar(&mut self, dev: DeviceHandle, index: u8) -> Result<MmioMapping, MapError>;

    /// Map region `index` write-combined. May be called while a plain MMIO
    /// mapping of the same region is live; the result is a second virtual
    /// alias over the identical physical range.
    fn map_bar_wc(&mut self, dev: DeviceHandle, index: u8) -> Result<MmioMapping, MapError>;

    fn alloc_coherent(&mut self, dev: DeviceHandle, len: usize) -> Result<DmaBuffer, AllocError>;

    /// Bind `handler` to the device's assigned interrupt line and return that
    /// line number. The handler may be invoked at any point after this call
    /// returns, concurrently with the caller.
    fn request_irq(
        &mut self,
        dev: DeviceHandle,
        handler: Arc<dyn IrqHandler>,
        flags: IrqFlags,
    ) -> Result<u32, IrqError>;

    fn free_irq(&mut self, dev: DeviceHandle, line: u32);
    fn free_coherent(&mut self, dev: DeviceHandle, buf: DmaBuffer);
    fn unmap(&mut self, dev: DeviceHandle, mapping: MmioMapping);
    fn release_regions(&mut self, dev: DeviceHandle);
    fn disable_device(&mut self, dev: DeviceHandle);

    /// Register-width access through a live mapping.
    fn mmio_read32(&self, mapping: MmioMapping, offset: u64) -> u32;
    fn mmio_write32(&mut self, mapping: MmioMapping, offset: u64, value: u32);
}

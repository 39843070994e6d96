//! Host-runtime collaborator contract for accelerator card drivers.
//!
//! The host runtime owns device discovery, driver matching and interrupt
//! dispatch; this crate only describes the seam between it and a driver: the
//! opaque handles it mints, the resource handles its bus primitives return,
//! and the traits both sides program against. Drivers (e.g. `accel-fpga`)
//! implement [`PciDriver`]; the host runtime implements [`HostBus`].

#![forbid(unsafe_code)]

mod bus;
mod driver;
mod id;
mod irq;

pub use bus::{
    AllocError, DeviceHandle, DmaBuffer, EnableError, HostBus, IrqError, MapError, MapToken,
    MmioMapping, RegionConflictError,
};
pub use driver::{ModuleMetadata, PciDriver};
pub use id::{DeviceId, DeviceIdTable};
pub use irq::{IrqFlags, IrqHandler, IrqVerdict};

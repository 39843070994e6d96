//! Lifecycle driver for the PCIe FPGA accelerator card.
//!
//! The host runtime discovers a matching device and calls
//! [`FpgaDriver::probe`], which runs a fixed six-step acquisition pipeline
//! (enable, regions, MMIO map, write-combined map, DMA buffer, interrupt).
//! A [`DeviceContext`] holding the acquired handles is published only once
//! every step has succeeded; any step failure unwinds the completed steps in
//! strict reverse order and leaves the device unbound. Removal replays the
//! same reverse order over the stored handles.
//!
//! The register-level protocol of the card is out of scope here; the
//! interrupt path carries a placeholder acknowledgment until the register
//! map lands.

#![forbid(unsafe_code)]

mod config;
mod context;
mod driver;
mod irq;
mod probe;

pub use config::{DriverConfig, DEFAULT_DMA_BUF_LEN, FPGA_ID_TABLE, REGISTER_REGION};
pub use context::{DeviceContext, DeviceShared};
pub use driver::{FpgaDriver, DRIVER_NAME};
pub use irq::CardIrqHandler;
pub use probe::ProbeError;

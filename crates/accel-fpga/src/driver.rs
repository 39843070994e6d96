use std::sync::Arc;

use accel_host::{DeviceHandle, DeviceIdTable, HostBus, ModuleMetadata, PciDriver};

use crate::config::DriverConfig;
use crate::context::{ContextTable, DeviceContext, DeviceShared};
use crate::probe::{self, Acquired, ProbeError};

/// Owner tag used when reserving the device's address regions.
pub const DRIVER_NAME: &str = "fpga_pci";

/// The FPGA card driver.
///
/// One instance serves every bound card; per-device state lives in the
/// context registry keyed by the host runtime's device handle. The host
/// runtime serializes probe/remove per device but may probe distinct devices
/// concurrently, so the only cross-device state is the immutable config and
/// the registry, which is locked solely to publish or take a context.
pub struct FpgaDriver {
    config: DriverConfig,
    contexts: ContextTable,
}

impl FpgaDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            contexts: ContextTable::default(),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Snapshot of the live context for `dev`, if one is published.
    pub fn context(&self, dev: DeviceHandle) -> Option<DeviceContext> {
        self.contexts.get(dev)
    }

    pub fn live_devices(&self) -> usize {
        self.contexts.len()
    }
}

impl PciDriver for FpgaDriver {
    type Error = ProbeError;

    fn id_table(&self) -> DeviceIdTable {
        self.config.id_table
    }

    fn metadata(&self) -> ModuleMetadata {
        self.config.metadata
    }

    fn probe(&self, host: &mut dyn HostBus, dev: DeviceHandle) -> Result<(), ProbeError> {
        tracing::debug!(dev = dev.index(), "probing fpga card");

        let shared = Arc::new(DeviceShared::default());
        let ctx = probe::acquire(host, dev, &self.config, shared)?;

        // Publication point: from here the interrupt capability claims
        // signals and the context is findable at removal.
        ctx.shared.publish();
        self.contexts.publish(dev, ctx);

        tracing::info!(dev = dev.index(), "fpga card initialized");
        Ok(())
    }

    fn remove(&self, host: &mut dyn HostBus, dev: DeviceHandle) {
        // The host runtime invokes remove exactly once, after the one
        // successful probe; a missing context is unrecoverable.
        let ctx = self
            .contexts
            .take(dev)
            .unwrap_or_else(|| panic!("remove for {dev:?} without a successful probe"));

        // A dispatch already in flight on the shared line must decline once
        // teardown starts.
        ctx.shared.unpublish();

        probe::release(host, dev, Acquired::from(ctx));
        tracing::info!(dev = dev.index(), "fpga card removed");
    }
}

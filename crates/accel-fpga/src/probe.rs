use std::sync::Arc;

use thiserror::Error;

use accel_host::{
    AllocError, DeviceHandle, DmaBuffer, EnableError, HostBus, IrqError, MapError, MmioMapping,
    RegionConflictError,
};

use crate::config::DriverConfig;
use crate::context::{DeviceContext, DeviceShared};
use crate::driver::DRIVER_NAME;
use crate::irq::CardIrqHandler;

/// Overall probe failure, wrapping the error of the step that failed.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ProbeError {
    #[error("failed to enable device: {0}")]
    Enable(#[from] EnableError),
    #[error("failed to reserve device regions: {0}")]
    RegionConflict(#[from] RegionConflictError),
    #[error("failed to map register region: {0}")]
    Map(#[from] MapError),
    #[error("failed to allocate DMA buffer: {0}")]
    Alloc(#[from] AllocError),
    #[error("failed to bind interrupt handler: {0}")]
    Irq(#[from] IrqError),
}

/// Resources produced by the completed pipeline steps, in acquisition order.
///
/// This is the teardown sequencer's only input: during a failed probe it
/// holds whatever the completed steps yielded, and at removal it is rebuilt
/// from the stored [`DeviceContext`]. Either way [`release`] frees exactly
/// these handles.
#[derive(Debug, Default)]
pub(crate) struct Acquired {
    enabled: bool,
    regions: bool,
    mmio: Option<MmioMapping>,
    wc: Option<MmioMapping>,
    dma: Option<DmaBuffer>,
    irq_line: Option<u32>,
}

impl From<DeviceContext> for Acquired {
    fn from(ctx: DeviceContext) -> Self {
        Self {
            enabled: ctx.enabled,
            regions: true,
            mmio: Some(ctx.mmio),
            wc: Some(ctx.wc),
            dma: Some(ctx.dma),
            irq_line: Some(ctx.irq_line),
        }
    }
}

/// Run the six-step acquisition pipeline for `dev`.
///
/// On any step failure the completed steps are unwound in reverse order
/// before the step's error is returned; the caller never sees a partially
/// initialized context.
pub(crate) fn acquire(
    host: &mut dyn HostBus,
    dev: DeviceHandle,
    config: &DriverConfig,
    shared: Arc<DeviceShared>,
) -> Result<DeviceContext, ProbeError> {
    let mut acquired = Acquired::default();
    match try_acquire(host, dev, config, shared, &mut acquired) {
        Ok(ctx) => Ok(ctx),
        Err(err) => {
            tracing::warn!(dev = dev.index(), %err, "probe failed, unwinding");
            release(host, dev, acquired);
            Err(err)
        }
    }
}

fn try_acquire(
    host: &mut dyn HostBus,
    dev: DeviceHandle,
    config: &DriverConfig,
    shared: Arc<DeviceShared>,
    acquired: &mut Acquired,
) -> Result<DeviceContext, ProbeError> {
    host.enable_device(dev)?;
    acquired.enabled = true;

    host.request_regions(dev, DRIVER_NAME)?;
    acquired.regions = true;

    let mmio = host.map_bar(dev, config.region_index)?;
    acquired.mmio = Some(mmio);

    // Second virtual alias over the same physical range, relaxed write
    // ordering for bulk transfers. Kept separate from `mmio` on purpose.
    let wc = host.map_bar_wc(dev, config.region_index)?;
    acquired.wc = Some(wc);

    let dma = host.alloc_coherent(dev, config.dma_buf_len)?;
    acquired.dma = Some(dma);

    // The handler can fire from here on; it declines signals until the
    // context is published by the caller.
    let handler = Arc::new(CardIrqHandler::new(shared.clone()));
    let irq_line = host.request_irq(dev, handler, config.irq_flags)?;
    acquired.irq_line = Some(irq_line);

    Ok(DeviceContext {
        mmio,
        wc,
        dma,
        irq_line,
        enabled: true,
        shared,
    })
}

/// Release the handles in `acquired`, in the exact reverse of acquisition
/// order: interrupt, DMA buffer, write-combined alias, MMIO mapping,
/// regions, enable.
pub(crate) fn release(host: &mut dyn HostBus, dev: DeviceHandle, acquired: Acquired) {
    if let Some(line) = acquired.irq_line {
        host.free_irq(dev, line);
    }
    if let Some(dma) = acquired.dma {
        host.free_coherent(dev, dma);
    }
    if let Some(wc) = acquired.wc {
        host.unmap(dev, wc);
    }
    if let Some(mmio) = acquired.mmio {
        host.unmap(dev, mmio);
    }
    if acquired.regions {
        host.release_regions(dev);
    }
    if acquired.enabled {
        host.disable_device(dev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_host::{IrqFlags, IrqHandler, MapToken};

    /// Records the release primitives in invocation order.
    #[derive(Default)]
    struct OrderHost {
        released: Vec<&'static str>,
    }

    impl HostBus for OrderHost {
        fn enable_device(&mut self, _dev: DeviceHandle) -> Result<(), EnableError> {
            Ok(())
        }

        fn request_regions(
            &mut self,
            _dev: DeviceHandle,
            _owner: &'static str,
        ) -> Result<(), RegionConflictError> {
            Ok(())
        }

        fn map_bar(&mut self, _dev: DeviceHandle, _index: u8) -> Result<MmioMapping, MapError> {
            Ok(mapping(1, false))
        }

        fn map_bar_wc(&mut self, _dev: DeviceHandle, _index: u8) -> Result<MmioMapping, MapError> {
            Ok(mapping(2, true))
        }

        fn alloc_coherent(
            &mut self,
            _dev: DeviceHandle,
            len: usize,
        ) -> Result<DmaBuffer, AllocError> {
            Ok(DmaBuffer {
                cpu_addr: 0x1000,
                bus_addr: 0x8000_0000,
                len,
            })
        }

        fn request_irq(
            &mut self,
            _dev: DeviceHandle,
            _handler: Arc<dyn IrqHandler>,
            _flags: IrqFlags,
        ) -> Result<u32, IrqError> {
            Ok(11)
        }

        fn free_irq(&mut self, _dev: DeviceHandle, _line: u32) {
            self.released.push("irq");
        }

        fn free_coherent(&mut self, _dev: DeviceHandle, _buf: DmaBuffer) {
            self.released.push("dma");
        }

        fn unmap(&mut self, _dev: DeviceHandle, mapping: MmioMapping) {
            self.released
                .push(if mapping.write_combined { "wc" } else { "mmio" });
        }

        fn release_regions(&mut self, _dev: DeviceHandle) {
            self.released.push("regions");
        }

        fn disable_device(&mut self, _dev: DeviceHandle) {
            self.released.push("disable");
        }

        fn mmio_read32(&self, _mapping: MmioMapping, _offset: u64) -> u32 {
            0
        }

        fn mmio_write32(&mut self, _mapping: MmioMapping, _offset: u64, _value: u32) {}
    }

    fn mapping(token: u64, write_combined: bool) -> MmioMapping {
        MmioMapping {
            token: MapToken(token),
            base: 0xe000_0000,
            len: 0x1000,
            write_combined,
        }
    }

    #[test]
    fn full_release_runs_in_reverse_acquisition_order() {
        let mut host = OrderHost::default();
        let dev = DeviceHandle::new(0);

        let shared = Arc::new(DeviceShared::default());
        let ctx = acquire(&mut host, dev, &DriverConfig::default(), shared)
            .expect("pipeline should succeed");

        release(&mut host, dev, Acquired::from(ctx));
        assert_eq!(
            host.released,
            vec!["irq", "dma", "wc", "mmio", "regions", "disable"]
        );
    }

    #[test]
    fn partial_record_releases_only_completed_steps() {
        let mut host = OrderHost::default();
        let dev = DeviceHandle::new(0);

        // As if step 4 (write-combined map) had failed.
        let acquired = Acquired {
            enabled: true,
            regions: true,
            mmio: Some(mapping(1, false)),
            ..Acquired::default()
        };

        release(&mut host, dev, acquired);
        assert_eq!(host.released, vec!["mmio", "regions", "disable"]);
    }
}

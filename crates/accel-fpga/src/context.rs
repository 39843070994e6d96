use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use accel_host::{DeviceHandle, DmaBuffer, MmioMapping};

/// Per-device state shared with the interrupt capability.
///
/// Everything here is an atomic: the interrupt handler reads it from a
/// context where it may neither block nor allocate, so it never sees the
/// registry lock or the [`DeviceContext`] itself.
#[derive(Debug, Default)]
pub struct DeviceShared {
    published: AtomicBool,
    irqs_handled: AtomicU64,
}

impl DeviceShared {
    /// True once the owning device's context has been fully constructed and
    /// published, and until teardown begins.
    pub fn is_published(&self) -> bool {
        self.published.load(Ordering::Acquire)
    }

    pub(crate) fn publish(&self) {
        self.published.store(true, Ordering::Release);
    }

    pub(crate) fn unpublish(&self) {
        self.published.store(false, Ordering::Release);
    }

    pub(crate) fn record_handled(&self) {
        self.irqs_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn irqs_handled(&self) -> u64 {
        self.irqs_handled.load(Ordering::Relaxed)
    }
}

/// Handles produced by one successful probe of one physical device.
///
/// Exactly one context exists per device between its probe and its removal;
/// teardown consumes the context and releases precisely these handles, never
/// freshly recomputed equivalents.
#[derive(Clone, Debug)]
pub struct DeviceContext {
    /// Non-cacheable register mapping over the configured region.
    pub mmio: MmioMapping,
    /// Write-combined alias over the same physical range as `mmio`.
    pub wc: MmioMapping,
    pub dma: DmaBuffer,
    /// Line the interrupt capability is bound to.
    pub irq_line: u32,
    pub enabled: bool,
    pub shared: Arc<DeviceShared>,
}

/// Registry of live contexts keyed by the host runtime's opaque handle.
///
/// Locked only to publish after a successful probe and to take the context
/// back at removal; acquisition steps and the interrupt path never touch it.
#[derive(Debug, Default)]
pub(crate) struct ContextTable {
    entries: Mutex<BTreeMap<DeviceHandle, DeviceContext>>,
}

impl ContextTable {
    pub(crate) fn publish(&self, dev: DeviceHandle, ctx: DeviceContext) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let prev = entries.insert(dev, ctx);
        assert!(prev.is_none(), "duplicate probe for {dev:?}");
    }

    pub(crate) fn take(&self, dev: DeviceHandle) -> Option<DeviceContext> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&dev)
    }

    pub(crate) fn get(&self, dev: DeviceHandle) -> Option<DeviceContext> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&dev).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }
}

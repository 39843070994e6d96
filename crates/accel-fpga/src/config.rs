use accel_host::{DeviceId, DeviceIdTable, IrqFlags, ModuleMetadata};

/// Devices this driver binds to.
pub const FPGA_ID_TABLE: DeviceIdTable = DeviceIdTable::new(&[DeviceId::new(0x1234, 0x5678)]);

/// Index of the address region holding the card's register file. Both the
/// MMIO and write-combined mappings are taken over this one region.
pub const REGISTER_REGION: u8 = 0;

/// Length of the per-device DMA-coherent command buffer.
pub const DEFAULT_DMA_BUF_LEN: usize = 4096;

/// Configuration consumed once, at driver construction. There is no global
/// driver descriptor; callers that want different ids or buffer sizes build
/// a different config.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    /// Match table consulted by the host runtime before probe.
    pub id_table: DeviceIdTable,
    /// Region index mapped for register access (plain and write-combined).
    pub region_index: u8,
    /// DMA-coherent buffer length, in bytes.
    pub dma_buf_len: usize,
    /// Interrupt request flags. The card sits on a shared line on every
    /// supported platform.
    pub irq_flags: IrqFlags,
    pub metadata: ModuleMetadata,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            id_table: FPGA_ID_TABLE,
            region_index: REGISTER_REGION,
            dma_buf_len: DEFAULT_DMA_BUF_LEN,
            irq_flags: IrqFlags::SHARED,
            metadata: ModuleMetadata {
                license: "GPL",
                author: "Tsuyoshi Hamada",
                description: "PCIe FPGA Board Driver",
            },
        }
    }
}

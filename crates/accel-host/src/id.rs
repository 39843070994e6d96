/// PCI vendor/device identification pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DeviceId {
    pub vendor_id: u16,
    pub device_id: u16,
}

impl DeviceId {
    pub const fn new(vendor_id: u16, device_id: u16) -> Self {
        Self {
            vendor_id,
            device_id,
        }
    }
}

/// Immutable match table consulted by the host runtime before binding a
/// driver to a discovered device.
#[derive(Clone, Copy, Debug)]
pub struct DeviceIdTable {
    entries: &'static [DeviceId],
}

impl DeviceIdTable {
    pub const fn new(entries: &'static [DeviceId]) -> Self {
        Self { entries }
    }

    /// Pure membership predicate; no mutation, no failure modes.
    pub fn matches(&self, id: DeviceId) -> bool {
        self.entries.contains(&id)
    }

    pub fn entries(&self) -> &'static [DeviceId] {
        self.entries
    }
}

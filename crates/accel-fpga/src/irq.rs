use std::sync::Arc;

use accel_host::{IrqHandler, IrqVerdict};

use crate::context::DeviceShared;

/// Interrupt capability for one card.
///
/// Holds an explicit reference to the owning device's shared state rather
/// than looking anything up at dispatch time. Registered with the host at
/// probe step 6, which is before the device context is published: in that
/// window (and again once teardown has begun) it declines the signal so the
/// host runtime keeps forwarding to the line's other handlers.
pub struct CardIrqHandler {
    shared: Arc<DeviceShared>,
}

impl CardIrqHandler {
    pub(crate) fn new(shared: Arc<DeviceShared>) -> Self {
        Self { shared }
    }
}

impl IrqHandler for CardIrqHandler {
    fn handle_interrupt(&self, _line: u32) -> IrqVerdict {
        if !self.shared.is_published() {
            return IrqVerdict::NotHandled;
        }

        // TODO: read the card's interrupt status register and decline signals
        // raised by line-sharing peers once the register map is finalized.
        self.shared.record_handled();
        IrqVerdict::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_until_published() {
        let shared = Arc::new(DeviceShared::default());
        let handler = CardIrqHandler::new(shared.clone());

        assert_eq!(handler.handle_interrupt(11), IrqVerdict::NotHandled);
        assert_eq!(shared.irqs_handled(), 0);

        shared.publish();
        assert_eq!(handler.handle_interrupt(11), IrqVerdict::Handled);
        assert_eq!(shared.irqs_handled(), 1);

        shared.unpublish();
        assert_eq!(handler.handle_interrupt(11), IrqVerdict::NotHandled);
        assert_eq!(shared.irqs_handled(), 1);
    }
}

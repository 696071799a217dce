//! Bus-peripheral models evaluated once per active bus cycle.

/// Read-write word store with byte-enabled writes.
pub mod ram;
/// Read-only word store with bulk image loading.
pub mod rom;
/// Serial receive decoder and bit-period pacing.
pub mod uart;

pub use ram::Ram;
pub use rom::Rom;
pub use uart::{BitPeriod, RxState, UartRx};

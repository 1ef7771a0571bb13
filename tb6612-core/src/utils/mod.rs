//! Utility re-exports and helper macros for the TB6612 drive core.
//!
//! - `controllers`: H-bridge channels, the dual-motor dispatcher and the
//!   command-driven controller loop
//! - `math`: signed power to direction/magnitude conversion
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod controllers;
pub mod math;

pub use controllers::{DriveController, Tb6612};
pub use math::power::{Direction, Polarity, RangePolicy, MAX_POWER};

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}

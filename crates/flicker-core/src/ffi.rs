//! Foreign-function export for the simulation driver.
//!
//! The driver imports a single no-argument, stateful function and calls
//! it once per time step:
//!
//! ```systemverilog
//! import "DPI-C" function real dpi_flicker_noise();
//! ```
//!
//! The import must NOT be declared `pure`: every call has side effects.
//! The boundary is defined for a single, strictly sequential caller; the
//! mutex exists only because Rust statics require `Sync`, not to grant a
//! concurrency contract.

use std::sync::{Mutex, OnceLock};

use crate::boundary::{BoundaryConfig, CallBoundary};

static BOUNDARY: OnceLock<Mutex<CallBoundary>> = OnceLock::new();

/// Install the process-wide call boundary.
///
/// Call once at startup, before the driver's first sample request, to
/// select the backend. Returns `false` if a boundary was already
/// installed (first installation wins, matching "exactly one logical
/// instance per process").
pub fn install(config: BoundaryConfig) -> bool {
    BOUNDARY
        .set(Mutex::new(CallBoundary::new(config)))
        .is_ok()
}

fn boundary() -> &'static Mutex<CallBoundary> {
    BOUNDARY.get_or_init(|| Mutex::new(CallBoundary::default()))
}

/// The exported entry point: one flicker noise sample per call.
///
/// Lazily installs a default streaming boundary if [`install`] was not
/// called first.
#[no_mangle]
pub extern "C" fn dpi_flicker_noise() -> f64 {
    let mut guard = match boundary().lock() {
        Ok(guard) => guard,
        // A poisoned lock only means a previous caller panicked mid-call;
        // the generator state itself is still coherent.
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.next()
}

//! Per-node time-integration kernels.
//!
//! All kernels here mutate caller-owned flat buffers in place and are
//! dimension-generic: the same code path serves 1D, 2D, and 3D fields via
//! the flattened node index of the layout.

mod adams_bashforth;
mod runge_kutta;
mod update;

pub use adams_bashforth::{AbOrder, AdamsBashforth, Phase};
pub use runge_kutta::{rk_stage, LowStorageRk, LOW_STORAGE_RK3, LOW_STORAGE_RK4};
pub use update::{compute_dsdt, update_solution};

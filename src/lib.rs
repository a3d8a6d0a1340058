//! # sem-rs
//!
//! Per-node compute kernels for spectral element PDE solvers.
//!
//! This crate provides the buffer-level core of a spectral-element time
//! stepper:
//! - Flat-buffer layouts for scalar/vector/tensor nodal fields (1D/2D/3D)
//! - Explicit solution update and right-hand-side assembly
//! - Adams-Bashforth multistep schemes (2nd/3rd/4th order) with in-place
//!   history-ring rotation
//! - A generic low-storage Runge-Kutta stage accumulator with documented
//!   coefficient tables
//! - Contravariant-basis (metric cofactor) computation for hexahedral
//!   elements
//!
//! Every kernel is a data-parallel map over the index space
//! `{0..N}^d × {0..nVar} × {0..nEl}`: each output offset is written by one
//! logical execution unit that reads only its own offsets. Host concerns
//! (mesh construction, basis operators, flux physics, scheduling) live
//! outside this crate; the interface is flat `[f64]` buffers sized by the
//! layout types plus scheme coefficients.

mod dispatch;

pub mod error;
pub mod geometry;
pub mod kernels;
pub mod layout;

pub use error::KernelError;
pub use geometry::{contravariant_basis_hex, metric_layout};
pub use kernels::{
    compute_dsdt, rk_stage, update_solution, AbOrder, AdamsBashforth, LowStorageRk, Phase,
    LOW_STORAGE_RK3, LOW_STORAGE_RK4,
};
pub use layout::{Dim, ScalarLayout, TensorLayout, VectorLayout};

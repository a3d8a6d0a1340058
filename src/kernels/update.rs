//! Elementwise solution update and right-hand-side assembly.
//!
//! These are the two pure elementwise kernels of the time-stepping loop:
//!
//! `solution[idx] += dt * dSdt[idx]`
//! `dSdt[idx] = source[idx] - fluxDivergence[idx]`
//!
//! Both apply at every `(node, variable, element)` offset of the field.
//! The formulas are identical in 1D/2D/3D apart from node arity, so a
//! single kernel covers all three via the flattened node index of
//! [`ScalarLayout`].

use crate::dispatch;
use crate::error::{check_len, KernelError};
use crate::layout::ScalarLayout;

/// Advance the solution one explicit Euler increment:
/// `solution += dt * dSdt`.
///
/// Both buffers must have length `layout.len()`. The update is performed
/// in place; no other memory is touched.
///
/// # Example
///
/// ```
/// use sem_rs::{Dim, ScalarLayout, update_solution};
///
/// let layout = ScalarLayout::new(1, 1, 2, Dim::One);
/// let mut solution = vec![1.0; layout.len()];
/// let dsdt = vec![2.0; layout.len()];
/// update_solution(&mut solution, &dsdt, 0.5, layout).unwrap();
/// assert!(solution.iter().all(|&s| (s - 2.0).abs() < 1e-15));
/// ```
pub fn update_solution(
    solution: &mut [f64],
    dsdt: &[f64],
    dt: f64,
    layout: ScalarLayout,
) -> Result<(), KernelError> {
    check_len("solution", solution.len(), layout.len())?;
    check_len("dSdt", dsdt.len(), layout.len())?;

    let stride = layout.elem_stride();
    dispatch::zip_chunks(solution, stride, dsdt, stride, |_, sol, dsdt| {
        for (s, d) in sol.iter_mut().zip(dsdt) {
            *s += dt * d;
        }
    });
    Ok(())
}

/// Assemble the right-hand side: `dSdt = source - fluxDivergence`.
///
/// All three buffers must have length `layout.len()`. `dSdt` is
/// overwritten in full.
pub fn compute_dsdt(
    dsdt: &mut [f64],
    source: &[f64],
    flux_divergence: &[f64],
    layout: ScalarLayout,
) -> Result<(), KernelError> {
    check_len("dSdt", dsdt.len(), layout.len())?;
    check_len("source", source.len(), layout.len())?;
    check_len("fluxDivergence", flux_divergence.len(), layout.len())?;

    let stride = layout.elem_stride();
    dispatch::zip3_chunks(
        dsdt,
        stride,
        source,
        stride,
        flux_divergence,
        stride,
        |_, out, src, flux| {
            for ((o, s), f) in out.iter_mut().zip(src).zip(flux) {
                *o = s - f;
            }
        },
    );
    Ok(())
}

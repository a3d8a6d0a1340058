//! Low-storage explicit Runge-Kutta stage accumulation.
//!
//! The accumulator is a two-line recurrence applied per
//! `(node, variable, element)` offset:
//!
//! `grk = rk_a * grk + dSdt`
//! `solution += rk_g * dt * grk`
//!
//! It has no notion of which stage it is running; a full scheme is obtained
//! by sequencing calls with a coefficient table such as
//! [`LOW_STORAGE_RK3`]. The work buffer `grk` is never zeroed here: the
//! schemes shipped with this crate open with `rk_a = 0`, which overwrites
//! the accumulator on the first stage, but the caller owns the buffer
//! contents between time steps and must keep them finite (a stale NaN
//! survives multiplication by zero).
//!
//! The work buffer may be padded to `nWork >= nVar` variable slots; only
//! the first `nVar` columns are touched.

use crate::dispatch;
use crate::error::{check_len, KernelError};
use crate::layout::ScalarLayout;

/// Coefficient table for a low-storage explicit RK scheme.
///
/// `a[s]` multiplies the accumulator and `g[s]` weights the solution
/// increment at stage `s`; the two slices have equal length.
#[derive(Clone, Copy, Debug)]
pub struct LowStorageRk {
    /// Accumulator coefficients, one per stage; the first entry is 0.
    pub a: &'static [f64],
    /// Solution-increment weights, one per stage.
    pub g: &'static [f64],
}

impl LowStorageRk {
    /// Number of stages.
    #[inline]
    pub const fn n_stages(&self) -> usize {
        self.a.len()
    }

    /// The `(rk_a, rk_g)` pair for one stage.
    #[inline]
    pub fn stage(&self, s: usize) -> (f64, f64) {
        (self.a[s], self.g[s])
    }
}

/// Williamson 3-stage, third-order low-storage scheme.
pub const LOW_STORAGE_RK3: LowStorageRk = LowStorageRk {
    a: &[0.0, -5.0 / 9.0, -153.0 / 128.0],
    g: &[1.0 / 3.0, 15.0 / 16.0, 8.0 / 15.0],
};

/// Carpenter-Kennedy 5-stage, fourth-order low-storage scheme.
pub const LOW_STORAGE_RK4: LowStorageRk = LowStorageRk {
    a: &[
        0.0,
        -567301805773.0 / 1357537059087.0,
        -2404267990393.0 / 2016746695238.0,
        -3550918686646.0 / 2091501179385.0,
        -1275806237668.0 / 842570457699.0,
    ],
    g: &[
        1432997174477.0 / 9575080441755.0,
        5161836677717.0 / 13612068292357.0,
        1720146321549.0 / 2090206949498.0,
        3134564353537.0 / 4481467310338.0,
        2277821191437.0 / 14882151754819.0,
    ],
};

/// Apply one RK stage: `grk = rk_a*grk + dSdt; solution += rk_g*dt*grk`.
///
/// `solution` and `dsdt` must have length `layout.len()`; `grk` must have
/// the length of the layout widened to `n_work` variable slots, with
/// `n_work >= layout.n_var()`.
#[allow(clippy::too_many_arguments)]
pub fn rk_stage(
    grk: &mut [f64],
    solution: &mut [f64],
    dsdt: &[f64],
    rk_a: f64,
    rk_g: f64,
    dt: f64,
    n_work: usize,
    layout: ScalarLayout,
) -> Result<(), KernelError> {
    let n_var = layout.n_var();
    if n_work < n_var {
        return Err(KernelError::WorkWidthTooSmall { n_work, n_var });
    }
    let work = layout.with_n_var(n_work);
    check_len("grk", grk.len(), work.len())?;
    check_len("solution", solution.len(), layout.len())?;
    check_len("dSdt", dsdt.len(), layout.len())?;

    let npe = layout.nodes_per_elem();
    dispatch::zip3_chunks_mut(
        grk,
        work.elem_stride(),
        solution,
        layout.elem_stride(),
        dsdt,
        layout.elem_stride(),
        |_, g_el, sol_el, dsdt_el| {
            for i_var in 0..n_var {
                for node in 0..npe {
                    let w = work.offset_in_elem(i_var, node);
                    let s = layout.offset_in_elem(i_var, node);
                    g_el[w] = rk_a * g_el[w] + dsdt_el[s];
                    sol_el[s] += rk_g * dt * g_el[w];
                }
            }
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Dim;

    #[test]
    fn test_single_stage_recurrence() {
        let layout = ScalarLayout::new(1, 2, 2, Dim::One);
        let n = layout.len();
        let mut grk: Vec<f64> = (0..n).map(|i| 0.5 * i as f64).collect();
        let mut sol: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();
        let dsdt: Vec<f64> = (0..n).map(|i| -(i as f64)).collect();
        let (g0, s0) = (grk.clone(), sol.clone());

        let (rk_a, rk_g, dt) = (-0.6, 0.3, 0.1);
        rk_stage(&mut grk, &mut sol, &dsdt, rk_a, rk_g, dt, 2, layout).unwrap();

        for i in 0..n {
            let g_expected = rk_a * g0[i] + dsdt[i];
            assert!((grk[i] - g_expected).abs() < 1e-15);
            assert!((sol[i] - (s0[i] + rk_g * dt * g_expected)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_padded_work_columns_untouched() {
        // nWork = 3 for a 2-variable field: the padding column keeps its
        // marker values.
        let layout = ScalarLayout::new(1, 2, 2, Dim::One);
        let work = layout.with_n_var(3);
        let mut grk = vec![7.0; work.len()];
        let mut sol = vec![0.0; layout.len()];
        let dsdt = vec![1.0; layout.len()];

        rk_stage(&mut grk, &mut sol, &dsdt, 0.0, 1.0, 0.1, 3, layout).unwrap();

        let npe = layout.nodes_per_elem();
        for i_el in 0..layout.n_elem() {
            for node in 0..npe {
                assert_eq!(grk[work.index(node, 2, i_el)], 7.0);
            }
            for i_var in 0..2 {
                for node in 0..npe {
                    assert_eq!(grk[work.index(node, i_var, i_el)], 1.0);
                }
            }
        }
    }

    #[test]
    fn test_first_stage_overwrites_accumulator() {
        let layout = ScalarLayout::new(0, 1, 1, Dim::One);
        let mut grk = vec![123.0];
        let mut sol = vec![0.0];
        let dsdt = vec![2.0];
        let (rk_a, rk_g) = LOW_STORAGE_RK3.stage(0);
        rk_stage(&mut grk, &mut sol, &dsdt, rk_a, rk_g, 1.0, 1, layout).unwrap();
        assert_eq!(grk[0], 2.0);
    }

    #[test]
    fn test_narrow_work_buffer_rejected() {
        let layout = ScalarLayout::new(1, 3, 1, Dim::One);
        let mut grk = vec![0.0; layout.with_n_var(2).len()];
        let mut sol = vec![0.0; layout.len()];
        let dsdt = vec![0.0; layout.len()];
        let err = rk_stage(&mut grk, &mut sol, &dsdt, 0.0, 1.0, 0.1, 2, layout).unwrap_err();
        assert_eq!(err, KernelError::WorkWidthTooSmall { n_work: 2, n_var: 3 });
    }

    #[test]
    fn test_tables_are_consistent() {
        for scheme in [LOW_STORAGE_RK3, LOW_STORAGE_RK4] {
            assert_eq!(scheme.a.len(), scheme.g.len());
            assert_eq!(scheme.a[0], 0.0);
        }
    }
}

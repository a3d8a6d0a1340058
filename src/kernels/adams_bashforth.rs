//! Explicit multistep (Adams-Bashforth family) solution recombination.
//!
//! Each scheme keeps `p` previous time-levels of the solution in a
//! caller-owned history buffer laid out as `p` consecutive variable blocks
//! of width `nVar` (`nPrev = p * nVar`) within the usual nodal layout.
//! Once primed, every step performs, per `(node, variable, element)`
//! column:
//!
//! 1. rotate the history ring one slot older (oldest-first eviction),
//! 2. store the current solution into the newest slot,
//! 3. replace the solution with the scheme's weighted combination of the
//!    stored levels.
//!
//! The weights define the scheme's order of accuracy and are exact:
//!
//! 2-level: `{3/2, -1/2}`
//! 3-level: `{23, -16, 5} / 12`
//! 4-level: `{55, -59, 37, -9} / 24`
//!
//! Priming is a fixed choreography: the first `p - 1` calls copy the
//! current solution into history levels `p-2, ..., 0` in that order, and
//! call `p` restores the solution from level 0. The integrator owns its
//! phase and advances it on every call, so callers cannot desynchronize a
//! step counter from the buffer state; the per-call numeric behavior is a
//! pure function of the phase, exactly as if the phase were passed in.

use crate::dispatch;
use crate::error::{check_len, KernelError};
use crate::layout::ScalarLayout;

/// 2-level weights: second-order accurate.
const WEIGHTS_AB2: [f64; 2] = [1.5, -0.5];

/// 3-level weights: third-order accurate.
const WEIGHTS_AB3: [f64; 3] = [23.0 / 12.0, -16.0 / 12.0, 5.0 / 12.0];

/// 4-level weights: fourth-order accurate.
const WEIGHTS_AB4: [f64; 4] = [55.0 / 24.0, -59.0 / 24.0, 37.0 / 24.0, -9.0 / 24.0];

/// Order of an Adams-Bashforth scheme (equals its history depth).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbOrder {
    Second,
    Third,
    Fourth,
}

impl AbOrder {
    /// Number of stored history levels, `p`.
    #[inline]
    pub const fn n_levels(self) -> usize {
        match self {
            AbOrder::Second => 2,
            AbOrder::Third => 3,
            AbOrder::Fourth => 4,
        }
    }

    /// Steady-state combination weights, newest level first.
    #[inline]
    pub const fn weights(self) -> &'static [f64] {
        match self {
            AbOrder::Second => &WEIGHTS_AB2,
            AbOrder::Third => &WEIGHTS_AB3,
            AbOrder::Fourth => &WEIGHTS_AB4,
        }
    }
}

/// Integration phase: how many history levels have been filled so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Priming call `m` of the startup choreography, `m` in `[0, p)`.
    Priming(usize),
    /// History full; every call rotates, stores, and recombines.
    SteadyState,
}

/// An Adams-Bashforth multistep integrator.
///
/// The solution and history buffers are caller-owned; the integrator owns
/// only its phase. `step` performs exactly one call of the scheme and
/// advances the phase.
///
/// # Example
///
/// ```
/// use sem_rs::{AbOrder, AdamsBashforth, Dim, Phase, ScalarLayout};
///
/// let layout = ScalarLayout::new(0, 1, 1, Dim::One);
/// let mut ab = AdamsBashforth::new(AbOrder::Second);
/// let mut solution = vec![1.0];
/// let mut prevsol = vec![0.0; ab.history_layout(layout).len()];
///
/// ab.step(&mut solution, &mut prevsol, layout).unwrap(); // seed level 0
/// ab.step(&mut solution, &mut prevsol, layout).unwrap(); // restore
/// assert_eq!(ab.phase(), Phase::SteadyState);
///
/// solution[0] = 2.0;
/// ab.step(&mut solution, &mut prevsol, layout).unwrap();
/// assert!((solution[0] - (1.5 * 2.0 - 0.5 * 1.0)).abs() < 1e-15);
/// ```
#[derive(Clone, Debug)]
pub struct AdamsBashforth {
    order: AbOrder,
    phase: Phase,
}

impl AdamsBashforth {
    /// Create an unprimed integrator of the given order.
    pub fn new(order: AbOrder) -> Self {
        Self {
            order,
            phase: Phase::Priming(0),
        }
    }

    /// The scheme order.
    #[inline]
    pub fn order(&self) -> AbOrder {
        self.order
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the history is full and steps recombine.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.phase == Phase::SteadyState
    }

    /// Forget all history; the next `step` starts priming again.
    pub fn reset(&mut self) {
        self.phase = Phase::Priming(0);
    }

    /// Layout of the history buffer for a given solution layout:
    /// the same nodal shape with `p * nVar` variable slots.
    pub fn history_layout(&self, layout: ScalarLayout) -> ScalarLayout {
        layout.with_n_var(self.order.n_levels() * layout.n_var())
    }

    /// Perform one call of the scheme and advance the phase.
    ///
    /// `solution` must have length `layout.len()` and `prevsol` the length
    /// of [`Self::history_layout`]. Both are mutated in place; each
    /// `(node, variable, element)` column is independent of every other.
    pub fn step(
        &mut self,
        solution: &mut [f64],
        prevsol: &mut [f64],
        layout: ScalarLayout,
    ) -> Result<(), KernelError> {
        let history = self.history_layout(layout);
        check_len("solution", solution.len(), layout.len())?;
        check_len("prevsol", prevsol.len(), history.len())?;

        let levels = self.order.n_levels();
        let weights = self.order.weights();
        let n_var = layout.n_var();
        let npe = layout.nodes_per_elem();
        let sol_stride = layout.elem_stride();
        let hist_stride = history.elem_stride();

        match self.phase {
            Phase::Priming(m) if m + 1 < levels => {
                // Startup call m copies the solution into level p-2-m.
                let level = levels - 2 - m;
                dispatch::zip_chunks_mut(
                    solution,
                    sol_stride,
                    prevsol,
                    hist_stride,
                    |_, sol, prev| {
                        for i_var in 0..n_var {
                            for node in 0..npe {
                                prev[history.offset_in_elem(level * n_var + i_var, node)] =
                                    sol[layout.offset_in_elem(i_var, node)];
                            }
                        }
                    },
                );
            }
            Phase::Priming(_) => {
                // Final priming call restores the solution from level 0.
                dispatch::zip_chunks_mut(
                    solution,
                    sol_stride,
                    prevsol,
                    hist_stride,
                    |_, sol, prev| {
                        for i_var in 0..n_var {
                            for node in 0..npe {
                                sol[layout.offset_in_elem(i_var, node)] =
                                    prev[history.offset_in_elem(i_var, node)];
                            }
                        }
                    },
                );
            }
            Phase::SteadyState => {
                dispatch::zip_chunks_mut(
                    solution,
                    sol_stride,
                    prevsol,
                    hist_stride,
                    |_, sol, prev| {
                        for i_var in 0..n_var {
                            for node in 0..npe {
                                // Evict oldest-first, then store the newest.
                                for level in (1..levels).rev() {
                                    prev[history.offset_in_elem(level * n_var + i_var, node)] =
                                        prev[history
                                            .offset_in_elem((level - 1) * n_var + i_var, node)];
                                }
                                prev[history.offset_in_elem(i_var, node)] =
                                    sol[layout.offset_in_elem(i_var, node)];

                                let mut acc = 0.0;
                                for (level, w) in weights.iter().enumerate() {
                                    acc += w
                                        * prev[history
                                            .offset_in_elem(level * n_var + i_var, node)];
                                }
                                sol[layout.offset_in_elem(i_var, node)] = acc;
                            }
                        }
                    },
                );
            }
        }

        self.phase = match self.phase {
            Phase::Priming(m) if m + 1 < levels => Phase::Priming(m + 1),
            _ => Phase::SteadyState,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Dim;

    fn single_node_layout() -> ScalarLayout {
        ScalarLayout::new(0, 1, 1, Dim::One)
    }

    #[test]
    fn test_phase_progression_ab2() {
        let layout = single_node_layout();
        let mut ab = AdamsBashforth::new(AbOrder::Second);
        let mut sol = vec![1.0];
        let mut prev = vec![0.0; ab.history_layout(layout).len()];

        assert_eq!(ab.phase(), Phase::Priming(0));
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(ab.phase(), Phase::Priming(1));
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(ab.phase(), Phase::SteadyState);
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(ab.phase(), Phase::SteadyState);

        ab.reset();
        assert_eq!(ab.phase(), Phase::Priming(0));
    }

    #[test]
    fn test_ab2_steady_combination() {
        let layout = single_node_layout();
        let mut ab = AdamsBashforth::new(AbOrder::Second);
        let mut sol = vec![1.0];
        let mut prev = vec![0.0; 2];

        ab.step(&mut sol, &mut prev, layout).unwrap(); // level 0 <- 1.0
        ab.step(&mut sol, &mut prev, layout).unwrap(); // restore
        assert_eq!(sol[0], 1.0);

        sol[0] = 2.0;
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert!((sol[0] - (1.5 * 2.0 - 0.5 * 1.0)).abs() < 1e-15);
        assert_eq!(prev, vec![2.0, 1.0]);
    }

    #[test]
    fn test_ab3_priming_fills_level1_then_level0() {
        let layout = single_node_layout();
        let mut ab = AdamsBashforth::new(AbOrder::Third);
        let mut sol = vec![10.0];
        let mut prev = vec![0.0; 3];

        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(prev, vec![0.0, 10.0, 0.0]);

        sol[0] = 20.0;
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(prev, vec![20.0, 10.0, 0.0]);

        sol[0] = 99.0;
        ab.step(&mut sol, &mut prev, layout).unwrap(); // restore from level 0
        assert_eq!(sol[0], 20.0);
        assert!(ab.is_primed());
    }

    #[test]
    fn test_ab4_ring_rotation_markers() {
        // Five calls with distinct marker values; afterwards the newest
        // solution sits in slot 0 and the oldest surviving level in slot 3.
        let layout = single_node_layout();
        let mut ab = AdamsBashforth::new(AbOrder::Fourth);
        let mut sol = vec![10.0];
        let mut prev = vec![0.0; 4];

        ab.step(&mut sol, &mut prev, layout).unwrap(); // level 2 <- 10
        sol[0] = 20.0;
        ab.step(&mut sol, &mut prev, layout).unwrap(); // level 1 <- 20
        sol[0] = 30.0;
        ab.step(&mut sol, &mut prev, layout).unwrap(); // level 0 <- 30
        ab.step(&mut sol, &mut prev, layout).unwrap(); // restore -> 30
        assert_eq!(sol[0], 30.0);
        assert_eq!(prev, vec![30.0, 20.0, 10.0, 0.0]);

        sol[0] = 40.0;
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(prev, vec![40.0, 30.0, 20.0, 10.0]);

        let w = AbOrder::Fourth.weights();
        let expected = w[0] * 40.0 + w[1] * 30.0 + w[2] * 20.0 + w[3] * 10.0;
        assert!((sol[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_history_columns_do_not_alias() {
        // Two variables, two elements, three nodes: every column evolves
        // independently under rotation.
        let layout = ScalarLayout::new(2, 2, 2, Dim::One);
        let mut ab = AdamsBashforth::new(AbOrder::Second);
        let history = ab.history_layout(layout);
        let mut sol: Vec<f64> = (0..layout.len()).map(|i| i as f64).collect();
        let mut prev = vec![0.0; history.len()];

        let seeded = sol.clone();
        ab.step(&mut sol, &mut prev, layout).unwrap();
        sol.iter_mut().for_each(|v| *v = -1.0);
        ab.step(&mut sol, &mut prev, layout).unwrap();
        assert_eq!(sol, seeded);
    }

    #[test]
    fn test_undersized_history_rejected() {
        let layout = single_node_layout();
        let mut ab = AdamsBashforth::new(AbOrder::Fourth);
        let mut sol = vec![0.0];
        let mut prev = vec![0.0; 3]; // needs 4
        let err = ab.step(&mut sol, &mut prev, layout).unwrap_err();
        assert!(matches!(err, KernelError::SizeMismatch { buffer: "prevsol", .. }));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stimulus-grid scoring: intensity/frequency discrimination and the
//! scalar fitness mode.
//!
//! A circuit qualifies when its habituation onset shows *graded*
//! dependence on the stimulus: at some fixed period the cycle count
//! falls appreciably as amplitude rises (intensity sensitivity), and at
//! some fixed amplitude both the cycle count and the recovery time fall
//! appreciably as the period rises (frequency sensitivity). "Falls
//! appreciably" means every consecutive entry drops below
//! [`tolerances::GRADED_RATIO`] of its predecessor, so a flat or
//! non-monotone response never qualifies.
//!
//! The scalar [`fitness`] mode serves parameter optimization instead of
//! thresholded qualification: two asymmetric monotonicity scores at a
//! fixed stimulus triple, combined into one non-positive value.

use crate::circuit::Circuit;
use crate::error::Result;
use crate::habituation::{evaluate_habituation, run_habituation, StimulusSetting, BUDGET_CYCLES};
use crate::recovery::recovery_time;
use crate::tolerances;

/// Canonical stimulus periods of the 3×3 scoring grid.
pub const CANONICAL_PERIODS: [f64; 3] = [5.0, 10.0, 15.0];

/// Canonical stimulus amplitudes of the 3×3 scoring grid.
pub const CANONICAL_AMPLITUDES: [f64; 3] = [3.0, 5.0, 10.0];

/// Period triple of the scalar fitness mode (at fixed amplitude 15).
pub const FITNESS_PERIODS: [f64; 3] = [5.0, 10.0, 15.0];

/// Amplitude triple of the scalar fitness mode (at fixed period 10).
pub const FITNESS_AMPLITUDES: [f64; 3] = [10.0, 15.0, 20.0];

/// Rendered sentinel for "no recovery time applicable".
pub const NO_RECOVERY: f64 = -1.0;

/// Habituation counts and recovery times over the canonical grid.
///
/// Rows index periods, columns amplitudes. Counts at or above the cycle
/// budget (non-converged or unstable runs) are clamped to zero before
/// pooling.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    /// Habituation onset cycle counts, clamped.
    pub hts: [[f64; 3]; 3],
    /// Recovery times; [`NO_RECOVERY`] where not applicable.
    pub rts: [[f64; 3]; 3],
}

/// Evaluate the full canonical grid for one parameter vector.
pub fn score_table<C: Circuit>(circuit: &C, params: &[f64]) -> Result<ScoreTable> {
    let mut hts = [[0.0; 3]; 3];
    let mut rts = [[0.0; 3]; 3];
    for (i, &period) in CANONICAL_PERIODS.iter().enumerate() {
        for (j, &amplitude) in CANONICAL_AMPLITUDES.iter().enumerate() {
            let stim = StimulusSetting { period, amplitude };
            let run = run_habituation(circuit, params, &stim)?;
            let count = run.cycle_count();
            hts[i][j] = if count >= BUDGET_CYCLES {
                0.0
            } else {
                f64::from(count)
            };
            rts[i][j] = recovery_time(circuit, params, &stim, &run)?.unwrap_or(NO_RECOVERY);
        }
    }
    Ok(ScoreTable { hts, rts })
}

/// Consecutive ratios `entry[i+1] / entry[i]` of a triple.
#[must_use]
pub fn consecutive_ratios(triple: &[f64; 3]) -> [f64; 2] {
    [triple[1] / triple[0], triple[2] / triple[1]]
}

/// Whether a triple is all-positive and graded-decreasing: each entry
/// below [`tolerances::GRADED_RATIO`] of its predecessor.
#[must_use]
pub fn graded_decrease(triple: &[f64; 3]) -> bool {
    triple.iter().all(|&v| v > 0.0)
        && consecutive_ratios(triple)
            .iter()
            .all(|&r| r < tolerances::GRADED_RATIO)
}

/// Intensity sensitivity: some fixed-period row of the count matrix is
/// graded-decreasing across amplitudes.
#[must_use]
pub fn intensity_sensitive(hts: &[[f64; 3]; 3]) -> bool {
    hts.iter().any(graded_decrease)
}

/// Frequency sensitivity: some fixed-amplitude column has all-positive
/// counts, with both the counts and the recovery times graded-decreasing
/// across periods.
#[must_use]
pub fn frequency_sensitive(hts: &[[f64; 3]; 3], rts: &[[f64; 3]; 3]) -> bool {
    (0..3).any(|j| {
        let ht_col = [hts[0][j], hts[1][j], hts[2][j]];
        let rt_col = [rts[0][j], rts[1][j], rts[2][j]];
        graded_decrease(&ht_col)
            && consecutive_ratios(&rt_col)
                .iter()
                .all(|&r| r < tolerances::GRADED_RATIO)
    })
}

/// Boolean qualification: intensity sensitivity, and only then
/// frequency sensitivity, must both hold.
pub fn qualifies<C: Circuit>(circuit: &C, params: &[f64]) -> Result<bool> {
    let table = score_table(circuit, params)?;
    if !intensity_sensitive(&table.hts) {
        return Ok(false);
    }
    Ok(frequency_sensitive(&table.hts, &table.rts))
}

/// Asymmetric monotonicity score of a habituation-count triple.
///
/// Zero for a perfectly symmetric graded decrease, approaching −2 as
/// the triple inverts; exactly zero when any count hit the budget
/// (unusable runs carry no gradient information).
#[must_use]
pub fn asymmetric_score(h1: f64, h2: f64, h3: f64) -> f64 {
    let budget = f64::from(BUDGET_CYCLES);
    if h1 >= budget || h2 >= budget || h3 >= budget {
        return 0.0;
    }
    let d1 = h1 - h2;
    let d2 = h2 - h3;
    let mut norm = 2.0 * d1.abs().max(d2.abs());
    if d1 == 0.0 || d2 == 0.0 {
        norm += 1.0;
    }
    (d1 + d2) / norm - 1.0
}

/// Scalar fitness mode: product of the period-triple and
/// amplitude-triple monotonicity scores, sign-flipped so better is
/// closer to zero from below.
pub fn fitness<C: Circuit>(circuit: &C, params: &[f64]) -> Result<f64> {
    let fixed_amplitude = 15.0;
    let fixed_period = 10.0;

    let mut hp = [0.0; 3];
    for (h, &period) in hp.iter_mut().zip(&FITNESS_PERIODS) {
        *h = f64::from(evaluate_habituation(circuit, params, period, fixed_amplitude)?);
    }
    let period_score = asymmetric_score(hp[0], hp[1], hp[2]);

    let mut ha = [0.0; 3];
    for (h, &amplitude) in ha.iter_mut().zip(&FITNESS_AMPLITUDES) {
        *h = f64::from(evaluate_habituation(circuit, params, fixed_period, amplitude)?);
    }
    let amplitude_score = asymmetric_score(ha[0], ha[1], ha[2]);

    Ok(-(period_score * amplitude_score).abs())
}

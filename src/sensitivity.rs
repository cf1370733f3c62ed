// SPDX-License-Identifier: AGPL-3.0-or-later
//! One-at-a-time parameter sensitivity via log-scale bisection.
//!
//! For each parameter independently, find the largest multiplicative
//! perturbation `10^e` (in each direction) under which the circuit
//! still qualifies. The exponent is built by halving-step accumulation:
//! start at 0 with step 0.5, tentatively add the step, multiply the
//! parameter by `10^±e`, and roll the addition back whenever
//! qualification fails; the step halves until it reaches the resolution
//! floor, so every direction costs exactly
//! ⌈log2([`STEP_INIT`]/[`STEP_FLOOR`])⌉ = 9 qualification calls.
//!
//! The caller's parameter vector is copied for every probe and never
//! mutated.

use crate::circuit::Circuit;
use crate::error::Result;
use crate::score::qualifies;

/// Initial bisection step in log10 units.
pub const STEP_INIT: f64 = 0.5;

/// Resolution floor: the scan stops once the step is no longer above
/// this value.
pub const STEP_FLOOR: f64 = 0.001;

/// Per-parameter perturbation limits: `rows[i]` holds the maximum
/// log10-fold increase and (negated) decrease that preserve
/// qualification for parameter `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTable {
    /// `(max_log10_increase, max_log10_decrease)` per parameter.
    pub rows: Vec<(f64, f64)>,
}

/// One bisection direction. `sign` is +1 for increase, −1 for decrease;
/// the returned exponent is always the accumulated non-negative
/// magnitude.
fn direction_scan<F>(params: &[f64], index: usize, sign: f64, qualify: &mut F) -> Result<f64>
where
    F: FnMut(&[f64]) -> Result<bool>,
{
    let mut perturbation = 0.0;
    let mut step = STEP_INIT;
    while step > STEP_FLOOR {
        perturbation += step;
        let mut probe = params.to_vec();
        probe[index] *= 10_f64.powf(sign * perturbation);
        if !qualify(&probe)? {
            perturbation -= step;
        }
        step /= 2.0;
    }
    Ok(perturbation)
}

/// Scan every parameter with an arbitrary qualification predicate.
///
/// The predicate receives a perturbed copy of `params` and reports
/// whether the perturbed system still qualifies.
pub fn scan_sensitivity_with<F>(params: &[f64], qualify: &mut F) -> Result<SensitivityTable>
where
    F: FnMut(&[f64]) -> Result<bool>,
{
    let mut rows = Vec::with_capacity(params.len());
    for index in 0..params.len() {
        let up = direction_scan(params, index, 1.0, qualify)?;
        let down = direction_scan(params, index, -1.0, qualify)?;
        rows.push((up, -down));
    }
    Ok(SensitivityTable { rows })
}

/// Scan every parameter of `params` against the canonical
/// intensity/frequency qualification of `circuit`.
pub fn scan_sensitivity<C: Circuit>(circuit: &C, params: &[f64]) -> Result<SensitivityTable> {
    scan_sensitivity_with(params, &mut |probe| qualifies(circuit, probe))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exponent reached by halving accumulation under `e <= limit`,
    // worked out by hand for the reference limits below.
    const EXPECT_UP_AT_0_3: f64 = 0.298828125;
    const EXPECT_DOWN_AT_0_2: f64 = 0.19921875;

    #[test]
    fn positive_direction_converges_to_limit_from_below() {
        let params = [2.0, 7.0];
        let threshold = 2.0 * 10_f64.powf(0.3);
        let mut qualify = |p: &[f64]| Ok(p[0] <= threshold);
        let e = direction_scan(&params, 0, 1.0, &mut qualify).unwrap();
        assert_eq!(e, EXPECT_UP_AT_0_3);
    }

    #[test]
    fn negative_direction_converges_and_negates() {
        let params = [2.0, 7.0];
        let threshold = 2.0 * 10_f64.powf(-0.2);
        let table = scan_sensitivity_with(&params, &mut |p| {
            Ok(p[0] >= threshold && p[0] <= 2.0 * 10_f64.powf(0.3) && p[1] > 0.0)
        })
        .unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].0, EXPECT_UP_AT_0_3);
        assert_eq!(table.rows[0].1, -EXPECT_DOWN_AT_0_2);
        // Parameter 1 is unconstrained: both directions run to the
        // accumulation maximum.
        let max_exponent = 0.5 + 0.25 + 0.125 + 0.0625 + 0.03125 + 0.015625 + 0.0078125
            + 0.00390625
            + 0.001953125;
        assert_eq!(table.rows[1].0, max_exponent);
        assert_eq!(table.rows[1].1, -max_exponent);
    }

    #[test]
    fn each_direction_costs_exactly_nine_probes() {
        let params = [1.0];
        let mut calls = 0_u32;
        let mut qualify = |_p: &[f64]| {
            calls += 1;
            Ok(false)
        };
        let e = direction_scan(&params, 0, 1.0, &mut qualify).unwrap();
        assert_eq!(calls, 9);
        assert_eq!(e, 0.0);
    }

    #[test]
    fn never_qualifying_pins_both_directions_to_zero() {
        let table = scan_sensitivity_with(&[3.0, 4.0], &mut |_p| Ok(false)).unwrap();
        assert_eq!(table.rows, vec![(0.0, -0.0), (0.0, -0.0)]);
    }

    #[test]
    fn caller_params_are_untouched() {
        let params = vec![1.5, 2.5, 3.5];
        let snapshot = params.clone();
        let _ = scan_sensitivity_with(&params, &mut |_p| Ok(true)).unwrap();
        assert_eq!(params, snapshot);
    }
}

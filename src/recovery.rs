// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recovery-time probe: how long must a habituated circuit rest before
//! a fresh pulse again elicits a near-original response?
//!
//! From the habituated end state the unstimulated field is integrated
//! for a long rest window (`T·2^k`, topology-dependent `k`) with the
//! adaptive stepper, sampling a bank of candidate rest states every
//! [`tolerances::REST_SAMPLE_DT`] time units. A bisection over rest
//! duration then probes a single ON+OFF pulse from selected bank
//! states: while the probe peak stays below the recovery threshold
//! (relative to the very first habituation peak), the committed rest
//! grows; the probe delay halves until it reaches zero.
//!
//! Only runs that habituated within the cycle budget are probed;
//! everything else reports no recovery time.

use crate::circuit::{augment_params, out_of_bounds, Circuit, Phase, State, OUTPUT_IDX};
use crate::error::Result;
use crate::habituation::{run_habituation, HabituationRun, StimulusSetting};
use crate::ode::{dopri5_sampled, rk4_step};
use crate::tolerances;

/// Output peak of one probe pulse (ON+OFF) from `x0`.
///
/// Returns `None` when the probe itself destabilizes; the recovery
/// measurement is then meaningless.
fn pulse_response_peak<C: Circuit>(
    circuit: &C,
    k: &[f64],
    x0: &State,
    ton_steps: usize,
    toff_steps: usize,
) -> Option<f64> {
    let step = circuit.step_size();
    let on = |x: &State, t: f64| circuit.derivative(x, k, t, Phase::Stimulated);
    let off = |x: &State, t: f64| circuit.derivative(x, k, t, Phase::Unstimulated);

    let mut x = *x0;
    let mut t = 0.0;
    let mut peak = f64::NEG_INFINITY;
    for _ in 0..ton_steps {
        x = rk4_step(&on, &x, t, step);
        t += step;
        peak = peak.max(x[OUTPUT_IDX]);
    }
    if out_of_bounds(&x, circuit.ceiling()) {
        return None;
    }
    for _ in 0..toff_steps {
        x = rk4_step(&off, &x, t, step);
        t += step;
        peak = peak.max(x[OUTPUT_IDX]);
    }
    if out_of_bounds(&x, circuit.ceiling()) {
        return None;
    }
    Some(peak)
}

/// Minimal rest duration after which a probe pulse reaches the recovery
/// threshold, or `None` when the run is not usable (did not habituate
/// within budget) or a probe destabilized.
///
/// `run` must come from [`run_habituation`] with the same circuit,
/// parameters, and stimulus.
pub fn recovery_time<C: Circuit>(
    circuit: &C,
    params: &[f64],
    stim: &StimulusSetting,
    run: &HabituationRun,
) -> Result<Option<f64>> {
    if !run.usable() {
        return Ok(None);
    }
    let Some(first_peak) = run.first_peak() else {
        return Ok(None);
    };

    let k = augment_params(circuit, params, stim.amplitude)?;
    let step = circuit.step_size();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ton_steps = (circuit.ton() / step) as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let toff_steps = ((stim.period - circuit.ton()) / step) as usize;
    let cycle_samples = ton_steps + toff_steps;

    // Rest starts from the habituated state one full cycle before the
    // final sample, so the bank begins inside the converged regime
    // rather than at the tail of the last OFF relaxation.
    let n = run.trajectory.n_points();
    if n < cycle_samples + 2 {
        return Ok(None);
    }
    let start_state = run.trajectory.states[n - cycle_samples - 2];

    let off = |x: &State, t: f64| circuit.derivative(x, &k, t, Phase::Unstimulated);
    let rest_window = stim.period * f64::from(2_u32.pow(circuit.rest_depth()));
    let bank = dopri5_sampled(
        &off,
        &start_state,
        rest_window,
        tolerances::REST_SAMPLE_DT,
        tolerances::ADAPTIVE_ABS_TOL,
        tolerances::ADAPTIVE_REL_TOL,
    );
    if bank.is_empty() {
        return Ok(None);
    }

    // Geometric bisection over the probe delay.
    let mut delay = bank.len() / 2;
    let mut rest = 0_usize;
    while delay > 0 {
        let probe_state = bank[rest + delay - 1];
        let Some(peak) = pulse_response_peak(circuit, &k, &probe_state, ton_steps, toff_steps)
        else {
            return Ok(None);
        };
        if peak / first_peak < circuit.recovery_threshold() {
            // Not yet recovered at this rest duration: commit to it and
            // keep probing later states.
            rest += delay;
        }
        delay /= 2;
    }

    #[allow(clippy::cast_precision_loss)]
    Ok(Some(rest as f64 * tolerances::REST_SAMPLE_DT))
}

/// Habituation cycle count and recovery time at one stimulus setting.
pub fn evaluate_habituation_with_recovery<C: Circuit>(
    circuit: &C,
    params: &[f64],
    period: f64,
    amplitude: f64,
) -> Result<(u32, Option<f64>)> {
    let stim = StimulusSetting { period, amplitude };
    let run = run_habituation(circuit, params, &stim)?;
    let rt = recovery_time(circuit, params, &stim, &run)?;
    Ok((run.cycle_count(), rt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ReceptorFeedforward;
    use crate::habituation::{Outcome, Trajectory};

    fn synthetic_run(outcome: Outcome, cycles: u32) -> HabituationRun {
        HabituationRun {
            outcome,
            cycles,
            peaks: vec![(1.0, 0.4), (6.0, 0.39)],
            trajectory: Trajectory::default(),
        }
    }

    #[test]
    fn budget_exhausted_run_reports_no_recovery() {
        let stim = StimulusSetting {
            period: 5.0,
            amplitude: 3.0,
        };
        let run = synthetic_run(Outcome::BudgetExhausted, 50);
        let rt = recovery_time(&ReceptorFeedforward, &[0.5; 9], &stim, &run).unwrap();
        assert_eq!(rt, None);
    }

    #[test]
    fn unstable_run_reports_no_recovery() {
        let stim = StimulusSetting {
            period: 5.0,
            amplitude: 3.0,
        };
        let run = synthetic_run(Outcome::Unstable, 1);
        let rt = recovery_time(&ReceptorFeedforward, &[0.5; 9], &stim, &run).unwrap();
        assert_eq!(rt, None);
    }

    #[test]
    fn truncated_trajectory_is_refused() {
        // Habituated flag but a trajectory too short to rewind one
        // cycle: the probe declines instead of indexing out of range.
        let stim = StimulusSetting {
            period: 5.0,
            amplitude: 3.0,
        };
        let run = synthetic_run(Outcome::Habituated, 2);
        let rt = recovery_time(&ReceptorFeedforward, &[0.5; 9], &stim, &run).unwrap();
        assert_eq!(rt, None);
    }
}

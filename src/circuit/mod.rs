// SPDX-License-Identifier: AGPL-3.0-or-later
//! Circuit topologies: interchangeable stimulated/unstimulated
//! vector-field pairs.
//!
//! Every topology exposes the same six-species state and the same
//! contract: a pure derivative function parameterized by a flat rate
//! vector (with the current stimulus amplitude appended as its final
//! component) and the stimulation [`Phase`]. The unstimulated variant
//! is the identical equation set with the amplitude-driven input term
//! set to zero — internal relaxation terms are retained, so withdrawal
//! of the pulse never freezes the circuit.
//!
//! Protocol constants that differ between topologies (pulse width,
//! integration step, baseline state, rest depth, recovery threshold)
//! live on the topology itself rather than in module-level globals.

mod feedback_concat;
mod receptor_feedforward;
mod receptor_ra;

pub use feedback_concat::FeedbackConcat;
pub use receptor_feedforward::ReceptorFeedforward;
pub use receptor_ra::ReceptorRa;

use crate::error::{Error, Result};

/// Fixed-length state vector: species concentrations/occupancies.
pub type State = [f64; 6];

/// Index of the designated output species, common to all topologies.
pub const OUTPUT_IDX: usize = 5;

/// Stimulation phase of the square-wave input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pulse applied: full coupled dynamics including the
    /// amplitude-dependent input term.
    Stimulated,
    /// Pulse withdrawn: input term zero, relaxation terms retained.
    Unstimulated,
}

/// A circuit topology: vector-field pair plus protocol constants.
///
/// Implementations are stateless descriptors; all rates arrive through
/// the augmented parameter slice, so a single instance is safe to share
/// across independent integration runs.
pub trait Circuit {
    /// Human-readable topology name (used in driver output and errors).
    fn name(&self) -> &'static str;

    /// Number of rate parameters this topology expects (excluding the
    /// appended amplitude).
    fn param_len(&self) -> usize;

    /// Pulse (ON-phase) duration; must be shorter than any period.
    fn ton(&self) -> f64;

    /// Fixed RK4 step for the pulsed protocol.
    fn step_size(&self) -> f64 {
        0.001
    }

    /// Initial state of the habituation protocol.
    fn baseline(&self) -> State;

    /// Admissible upper bound per coordinate; crossing it (or dropping
    /// below zero, or going NaN) aborts a run as numerically unstable.
    fn ceiling(&self) -> f64 {
        1.0
    }

    /// Rest-window exponent `k`: the recovery probe relaxes the circuit
    /// for `T·2^k` time units before bisecting.
    fn rest_depth(&self) -> u32;

    /// Fraction of the original first peak a probe response must reach
    /// for the circuit to count as recovered.
    fn recovery_threshold(&self) -> f64;

    /// Time derivative at `x`. `k` is the augmented parameter vector
    /// (rates followed by the stimulus amplitude); `t` is simulation
    /// time, unused by the autonomous topologies but part of the
    /// contract.
    fn derivative(&self, x: &State, k: &[f64], t: f64, phase: Phase) -> State;
}

/// Append the stimulus amplitude to a rate vector, validating length.
///
/// Callers' slices are never mutated; every evaluation works on its own
/// augmented copy.
pub fn augment_params<C: Circuit>(circuit: &C, params: &[f64], amplitude: f64) -> Result<Vec<f64>> {
    if params.len() != circuit.param_len() {
        return Err(Error::InvalidInput(format!(
            "{} expects {} parameters, got {}",
            circuit.name(),
            circuit.param_len(),
            params.len()
        )));
    }
    let mut k = Vec::with_capacity(params.len() + 1);
    k.extend_from_slice(params);
    k.push(amplitude);
    Ok(k)
}

/// Whether any coordinate left the admissible range or went NaN.
#[must_use]
pub fn out_of_bounds(x: &State, ceiling: f64) -> bool {
    x.iter().any(|&v| v.is_nan() || v < 0.0 || v > ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_states() -> Vec<State> {
        vec![
            [0.0; 6],
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.3, 0.1, 0.2, 0.4, 0.5, 0.6],
            [0.9, 0.05, 0.05, 0.2, 0.1, 0.7],
        ]
    }

    fn uniform_params(n: usize) -> Vec<f64> {
        (0..n).map(|i| 0.3 + 0.1 * i as f64).collect()
    }

    /// The unstimulated field must equal the stimulated field with the
    /// amplitude forced to zero: the external input contribution is
    /// exactly zero, for all states.
    fn assert_input_term_vanishes<C: Circuit>(circuit: &C) {
        let params = uniform_params(circuit.param_len());
        let k_live = augment_params(circuit, &params, 7.5).unwrap();
        let k_dead = augment_params(circuit, &params, 0.0).unwrap();
        for x in probe_states() {
            let off = circuit.derivative(&x, &k_live, 0.0, Phase::Unstimulated);
            let zeroed = circuit.derivative(&x, &k_dead, 0.0, Phase::Stimulated);
            for i in 0..6 {
                assert_eq!(
                    off[i].to_bits(),
                    zeroed[i].to_bits(),
                    "{}: input term leaked into dx[{i}]",
                    circuit.name()
                );
            }
        }
    }

    #[test]
    fn unstimulated_input_term_is_zero() {
        assert_input_term_vanishes(&ReceptorFeedforward);
        assert_input_term_vanishes(&ReceptorRa);
        assert_input_term_vanishes(&FeedbackConcat);
    }

    #[test]
    fn receptor_pools_are_conserved() {
        // The receptor species of both receptor topologies form a
        // closed cycle: their derivatives sum to zero.
        for x in probe_states() {
            let p = uniform_params(9);
            let k = augment_params(&ReceptorFeedforward, &p, 4.0).unwrap();
            for phase in [Phase::Stimulated, Phase::Unstimulated] {
                let d = ReceptorFeedforward.derivative(&x, &k, 0.0, phase);
                assert!(
                    (d[0] + d[1] + d[2]).abs() < 1e-14,
                    "feedforward receptor pool leak: {:?}",
                    &d[..3]
                );
            }

            let p = uniform_params(10);
            let k = augment_params(&ReceptorRa, &p, 4.0).unwrap();
            for phase in [Phase::Stimulated, Phase::Unstimulated] {
                let d = ReceptorRa.derivative(&x, &k, 0.0, phase);
                assert!(
                    (d[0] + d[1] + d[5]).abs() < 1e-14,
                    "Ra receptor pool leak"
                );
            }
        }
    }

    #[test]
    fn augment_rejects_wrong_length() {
        let err = augment_params(&ReceptorFeedforward, &[1.0; 8], 3.0);
        assert!(err.is_err());
        let k = augment_params(&ReceptorFeedforward, &[1.0; 9], 3.0).unwrap();
        assert_eq!(k.len(), 10);
        assert_eq!(k[9], 3.0);
    }

    #[test]
    fn bounds_check_flags_nan_and_range() {
        assert!(!out_of_bounds(&[0.0; 6], 1.0));
        assert!(!out_of_bounds(&[1.0; 6], 1.0));
        assert!(out_of_bounds(&[1.0 + 1e-9, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0));
        assert!(out_of_bounds(&[-1e-9, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0));
        assert!(out_of_bounds(&[f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0));
        assert!(out_of_bounds(&[f64::INFINITY, 0.0, 0.0, 0.0, 0.0, 0.0], 1.0));
    }
}

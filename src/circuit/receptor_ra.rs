// SPDX-License-Identifier: AGPL-3.0-or-later
//! Receptor-adaptation "Ra" topology (10 rates).
//!
//! Variant of the receptor circuit in which the active receptor itself
//! is the output species and carries a delayed negative-feedback arm:
//! the active receptor induces a two-stage cascade whose product binds
//! back onto it. The extra rate (`k3`, feedback strength) brings the
//! count to ten.
//!
//! State layout: `x0` free receptor, `x1` desensitized receptor, `x2`,
//! `x4` cascade stages, `x3` feedback species, `x5` active receptor
//! (output).

use super::{Circuit, Phase, State};

/// Ten-rate receptor-adaptation circuit with feedback on the active
/// receptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceptorRa;

impl Circuit for ReceptorRa {
    fn name(&self) -> &'static str {
        "receptor-ra"
    }

    fn param_len(&self) -> usize {
        10
    }

    fn ton(&self) -> f64 {
        1.0
    }

    fn baseline(&self) -> State {
        [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    fn rest_depth(&self) -> u32 {
        12
    }

    fn recovery_threshold(&self) -> f64 {
        0.95
    }

    fn derivative(&self, x: &State, k: &[f64], _t: f64, phase: Phase) -> State {
        let amp = k[10];
        let input = match phase {
            Phase::Stimulated => k[0] * amp * (1.0 - x[1] - x[5]),
            Phase::Unstimulated => 0.0,
        };
        let resensitize = k[1] * (1.0 - x[0] - x[1]);
        let deactivate = k[2] * (1.0 - x[0] - x[5]);
        let feedback = k[3] * x[3] * x[5];
        [
            deactivate - input,
            resensitize - deactivate + feedback,
            x[5] * k[4] * (1.0 - x[2]) - k[5] * x[2],
            x[4] * k[8] * (1.0 - x[3]) - k[9] * x[3],
            x[2] * k[6] * (1.0 - x[4]) - k[7] * x[4],
            input - resensitize - feedback,
        ]
    }
}

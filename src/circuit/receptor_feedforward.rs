// SPDX-License-Identifier: AGPL-3.0-or-later
//! Receptor-driven incoherent feed-forward topology (9 rates).
//!
//! A three-state receptor cycle (free → active → desensitized) feeds an
//! intermediate species that drives the output both directly
//! (activation) and through a slower inhibitory arm — the incoherent
//! feed-forward motif that produces habituation of the output peak.
//!
//! | Index | Species |
//! |-------|---------|
//! | 0 | free receptor |
//! | 1 | desensitized receptor |
//! | 2 | active receptor |
//! | 3 | intermediate activator |
//! | 4 | inhibitor |
//! | 5 | output |
//!
//! All species are fractions of a unit total; the receptor states
//! appear through their complements `1 − xi − xj`, so the pool is
//! conserved by construction.

use super::{Circuit, Phase, State};

/// Nine-rate receptor feed-forward circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceptorFeedforward;

impl Circuit for ReceptorFeedforward {
    fn name(&self) -> &'static str {
        "receptor-feedforward"
    }

    fn param_len(&self) -> usize {
        9
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
        let amp = k[9];
        let input = match phase {
            Phase::Stimulated => k[0] * amp * (1.0 - x[1] - x[2]),
            Phase::Unstimulated => 0.0,
        };
        let resensitize = k[1] * (1.0 - x[0] - x[1]);
        let deactivate = k[2] * (1.0 - x[0] - x[2]);
        [
            deactivate - input,
            resensitize - deactivate,
            input - resensitize,
            x[2] * k[3] * (1.0 - x[3]) - k[4] * x[3],
            x[3] * k[5] * (1.0 - x[4]) - k[6] * x[4],
            x[3] * k[7] * (1.0 - x[5]) - x[4] * k[8] * x[5],
        ]
    }
}

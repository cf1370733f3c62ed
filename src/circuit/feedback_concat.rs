// SPDX-License-Identifier: AGPL-3.0-or-later
//! Concatenated negative-feedback topology (14 rates).
//!
//! Two adaptation stages in series. Each stage is a receptor/inhibitor/
//! output triad with Michaelis–Menten removal of the stage output; the
//! first stage's output drives the second stage's receptor, and the
//! second stage's output feeds its own inhibitor. Concatenation
//! sharpens frequency discrimination beyond what a single stage gives.
//!
//! Species totals are fixed at one unit per pool and appear explicitly
//! so the equations read like the mass-action forms they come from.

use super::{Circuit, Phase, State};

const RT1: f64 = 1.0;
const IT1: f64 = 1.0;
const OT1: f64 = 1.0;
const RT2: f64 = 1.0;
const IT2: f64 = 1.0;
const OT2: f64 = 1.0;

/// Fourteen-rate concatenated-feedback circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackConcat;

impl Circuit for FeedbackConcat {
    fn name(&self) -> &'static str {
        "feedback-concat"
    }

    fn param_len(&self) -> usize {
        14
    }

    fn ton(&self) -> f64 {
        1.11
    }

    fn baseline(&self) -> State {
        [0.0; 6]
    }

    fn rest_depth(&self) -> u32 {
        10
    }

    fn recovery_threshold(&self) -> f64 {
        0.9495
    }

    fn derivative(&self, x: &State, k: &[f64], _t: f64, phase: Phase) -> State {
        let amp = k[14];
        let input = match phase {
            Phase::Stimulated => amp * k[0] * (RT1 - x[0]),
            Phase::Unstimulated => 0.0,
        };
        [
            input - k[1] * x[0],
            x[2] * k[2] * (IT1 - x[1]) - k[3] * x[1],
            x[0] * k[4] * (OT1 - x[2]) - x[1] * k[5] * x[2] / (k[6] + x[2]),
            x[2] * k[12] * (RT2 - x[3]) - k[13] * x[3],
            x[5] * k[7] * (IT2 - x[4]) - k[8] * x[4],
            x[3] * k[9] * (OT2 - x[5]) - x[4] * k[10] * x[5] / (k[11] + x[5]),
        ]
    }
}

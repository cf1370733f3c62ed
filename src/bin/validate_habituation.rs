// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation: habituation protocol building blocks against worked
//! analytical references.
//!
//! Every expected value below is derived by hand (exact arithmetic or
//! closed-form solutions), so this binary needs no data files.

use habiscan::circuit::{augment_params, Circuit, Phase, ReceptorFeedforward};
use habiscan::habituation::{evaluate_habituation, peaks_converged, UNSTABLE_CYCLES};
use habiscan::ode::{dopri5_advance, rk4_step};
use habiscan::score::{asymmetric_score, graded_decrease};
use habiscan::sensitivity::scan_sensitivity_with;
use habiscan::tolerances;
use habiscan::validation::Validator;

fn main() {
    let mut v = Validator::new("Habituation protocol building blocks");

    // ── Integrators vs closed-form decay ────────────────────────────
    v.section("── Integrators ──");
    let decay = |y: &[f64; 6], _t: f64| -> [f64; 6] {
        let mut d = [0.0; 6];
        for i in 0..6 {
            d[i] = -0.5 * y[i];
        }
        d
    };
    let mut y = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let mut t = 0.0;
    for _ in 0..10_000 {
        y = rk4_step(&decay, &y, t, 0.001);
        t += 0.001;
    }
    let expected = (-0.5_f64 * 10.0).exp();
    v.check("RK4 exp(-0.5t) at t=10", y[0], expected, 1e-10);

    let mut y = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    dopri5_advance(
        &decay,
        &mut y,
        0.0,
        10.0,
        tolerances::ADAPTIVE_ABS_TOL,
        tolerances::ADAPTIVE_REL_TOL,
    );
    v.check("dopri5 exp(-0.5t) at t=10", y[0], expected, 1e-10);

    // ── Vector-field contract ───────────────────────────────────────
    v.section("── Unstimulated input term ──");
    let params = [0.7, 0.4, 0.9, 0.3, 0.2, 0.6, 0.1, 0.8, 0.5];
    let k_live = augment_params(&ReceptorFeedforward, &params, 9.0).unwrap();
    let k_dead = augment_params(&ReceptorFeedforward, &params, 0.0).unwrap();
    let x = [0.3, 0.1, 0.2, 0.4, 0.5, 0.6];
    let off = ReceptorFeedforward.derivative(&x, &k_live, 0.0, Phase::Unstimulated);
    let zeroed = ReceptorFeedforward.derivative(&x, &k_dead, 0.0, Phase::Stimulated);
    let max_dev = off
        .iter()
        .zip(&zeroed)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    v.check("input term vanishes when pulse withdrawn", max_dev, 0.0, 0.0);

    // ── Convergence rule ────────────────────────────────────────────
    v.section("── Peak convergence rule ──");
    v.check_bool("0.50 -> 0.26 still habituating", peaks_converged(0.5, 0.26), false);
    v.check_bool("0.50 -> 0.4995 converged", peaks_converged(0.50, 0.4995), true);

    // ── Qualification building blocks ───────────────────────────────
    v.section("── Graded-response checks ──");
    v.check_bool("[10,8,5] graded", graded_decrease(&[10.0, 8.0, 5.0]), true);
    v.check_bool("[10,12,5] not graded", graded_decrease(&[10.0, 12.0, 5.0]), false);
    v.check("score(10,8,6) symmetric", asymmetric_score(10.0, 8.0, 6.0), 0.0, 0.0);
    v.check("score(10,10,10) flat", asymmetric_score(10.0, 10.0, 10.0), -1.0, 0.0);

    // ── Instability sentinel ────────────────────────────────────────
    v.section("── Instability sentinel ──");
    let stiff = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0e8, 1.0];
    let count = evaluate_habituation(&ReceptorFeedforward, &stiff, 5.0, 10.0).unwrap();
    v.check_count("stiff run reports sentinel", count as usize, UNSTABLE_CYCLES as usize);

    // ── Bisection accumulation ──────────────────────────────────────
    v.section("── Sensitivity bisection ──");
    let base = [2.0];
    let limit = 2.0 * 10_f64.powf(0.3);
    let table = scan_sensitivity_with(&base, &mut |p| Ok(p[0] <= limit)).unwrap();
    v.check("exponent under e <= 0.3", table.rows[0].0, 0.298828125, 0.0);

    v.finish();
}

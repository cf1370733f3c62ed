// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fixed-step RK4 and adaptive Dormand–Prince 5(4) steppers.
//!
//! Classical RK4 drives the pulsed stimulation protocol, where the step
//! size also defines the trajectory sampling grid. The embedded
//! Dormand–Prince pair covers the long unstimulated rest integration,
//! where tight local-error control (1e-12 absolute/relative) matters
//! more than a uniform step.
//!
//! Both steppers work on the fixed six-species [`State`] used by every
//! circuit topology.

use crate::circuit::State;

/// Perform a single RK4 step.
///
/// Given `dx/dt = f(x, t)`, advance from `y` at time `t` by step `dt`.
#[must_use]
pub fn rk4_step<F>(f: &F, y: &State, t: f64, dt: f64) -> State
where
    F: Fn(&State, f64) -> State,
{
    let half_dt = 0.5 * dt;
    let k1 = f(y, t);

    let mut y2 = *y;
    for (yi, ki) in y2.iter_mut().zip(&k1) {
        *yi = half_dt.mul_add(*ki, *yi);
    }
    let k2 = f(&y2, t + half_dt);

    let mut y3 = *y;
    for (yi, ki) in y3.iter_mut().zip(&k2) {
        *yi = half_dt.mul_add(*ki, *yi);
    }
    let k3 = f(&y3, t + half_dt);

    let mut y4 = *y;
    for (yi, ki) in y4.iter_mut().zip(&k3) {
        *yi = dt.mul_add(*ki, *yi);
    }
    let k4 = f(&y4, t + dt);

    let sixth_dt = dt / 6.0;
    let mut out = *y;
    for (i, yi) in out.iter_mut().enumerate() {
        let slope = 2.0f64.mul_add(k2[i] + k3[i], k1[i] + k4[i]);
        *yi = sixth_dt.mul_add(slope, *yi);
    }
    out
}

// Dormand–Prince 5(4) tableau (Dormand & Prince 1980). The seventh
// stage equals the fifth-order solution (FSAL), so the error estimate
// comes free from the difference row E.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

fn weighted_state(y: &State, stages: &[State], coeffs: &[f64], h: f64) -> State {
    let mut out = *y;
    for (k, &a) in stages.iter().zip(coeffs) {
        if a == 0.0 {
            continue;
        }
        for (oi, ki) in out.iter_mut().zip(k) {
            *oi = (h * a).mul_add(*ki, *oi);
        }
    }
    out
}

/// One attempted Dormand–Prince step of size `h`.
///
/// Returns the fifth-order solution and the scaled error norm
/// (acceptable when ≤ 1).
fn dopri5_step<F>(f: &F, y: &State, t: f64, h: f64, abs_tol: f64, rel_tol: f64) -> (State, f64)
where
    F: Fn(&State, f64) -> State,
{
    let k1 = f(y, t);
    let k2 = f(&weighted_state(y, &[k1], &A2, h), t + C[1] * h);
    let k3 = f(&weighted_state(y, &[k1, k2], &A3, h), t + C[2] * h);
    let k4 = f(&weighted_state(y, &[k1, k2, k3], &A4, h), t + C[3] * h);
    let k5 = f(&weighted_state(y, &[k1, k2, k3, k4], &A5, h), t + C[4] * h);
    let k6 = f(&weighted_state(y, &[k1, k2, k3, k4, k5], &A6, h), t + C[5] * h);

    let y_next = weighted_state(y, &[k1, k2, k3, k4, k5, k6], &B, h);
    let k7 = f(&y_next, t + h);

    let stages = [k1, k2, k3, k4, k5, k6, k7];
    let mut err_sq = 0.0;
    for i in 0..y.len() {
        let mut e = 0.0;
        for (k, &c) in stages.iter().zip(&E) {
            e = c.mul_add(k[i], e);
        }
        e *= h;
        let scale = rel_tol.mul_add(y[i].abs().max(y_next[i].abs()), abs_tol);
        let r = e / scale;
        err_sq = r.mul_add(r, err_sq);
    }
    #[allow(clippy::cast_precision_loss)]
    let err = (err_sq / y.len() as f64).sqrt();
    (y_next, err)
}

/// Advance `y` from `t0` to `t1` with adaptive step control.
///
/// Standard PI-free controller: accept when the scaled error norm is
/// ≤ 1, then rescale the step by `0.9·err^(−1/5)` clamped to [0.2, 5].
/// NaN error estimates force a step rejection so a diverging state
/// cannot silently freeze the controller at an accepted step.
pub fn dopri5_advance<F>(f: &F, y: &mut State, t0: f64, t1: f64, abs_tol: f64, rel_tol: f64)
where
    F: Fn(&State, f64) -> State,
{
    const SAFETY: f64 = 0.9;
    const MIN_SCALE: f64 = 0.2;
    const MAX_SCALE: f64 = 5.0;

    let span = t1 - t0;
    if span <= 0.0 {
        return;
    }
    let mut t = t0;
    let mut h = span;
    let h_floor = span * 1e-14;

    while t < t1 {
        h = h.min(t1 - t);
        let (y_next, err) = dopri5_step(f, y, t, h, abs_tol, rel_tol);
        if err <= 1.0 {
            *y = y_next;
            t += h;
            let grow = if err == 0.0 {
                MAX_SCALE
            } else {
                (SAFETY * err.powf(-0.2)).clamp(MIN_SCALE, MAX_SCALE)
            };
            h *= grow;
        } else if err.is_nan() {
            h *= MIN_SCALE;
        } else {
            h *= (SAFETY * err.powf(-0.2)).clamp(MIN_SCALE, 1.0);
        }
        if h < h_floor {
            // Step size collapsed (stiff or divergent right-hand side).
            // Take the remaining interval in one unguarded step rather
            // than loop forever; the caller's bounds check catches the
            // fallout.
            *y = dopri5_step(f, y, t, t1 - t, abs_tol, rel_tol).0;
            return;
        }
    }
}

/// Integrate from `y0` over `duration`, recording the state at every
/// multiple of `sample_dt`. The returned bank excludes the initial
/// state and holds `floor(duration / sample_dt)` entries.
#[must_use]
pub fn dopri5_sampled<F>(
    f: &F,
    y0: &State,
    duration: f64,
    sample_dt: f64,
    abs_tol: f64,
    rel_tol: f64,
) -> Vec<State>
where
    F: Fn(&State, f64) -> State,
{
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_samples = (duration / sample_dt) as usize;
    let mut bank = Vec::with_capacity(n_samples);
    let mut y = *y0;
    let mut t = 0.0;
    for _ in 0..n_samples {
        dopri5_advance(f, &mut y, t, t + sample_dt, abs_tol, rel_tol);
        t += sample_dt;
        bank.push(y);
    }
    bank
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Centralized numeric thresholds with documented origin.
//!
//! Every threshold used by the habituation protocol and its scoring is
//! defined here. No ad-hoc magic numbers in the algorithm bodies.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Convergence | relative peak change | 0.01 |
//! | Qualification | graded-response ratio | 0.95 |
//! | Integrator | adaptive step control | 1e-12 |

/// Relative peak-to-peak change below which a circuit counts as
/// habituated: `|1 − p[n]/p[n−1]| < PEAK_CONVERGENCE`.
pub const PEAK_CONVERGENCE: f64 = 0.01;

/// Output level below which the response is considered flatlined.
///
/// Guards the peak-ratio convergence test against division by a
/// near-zero previous peak: a response this small has effectively
/// habituated to nothing, and the run stops instead of propagating
/// inf/NaN through the ratio.
pub const MIN_PEAK_LEVEL: f64 = 1e-4;

/// Consecutive-entry ratio bound for graded intensity/frequency
/// discrimination: each successive habituation count (or recovery time)
/// must fall to less than 95% of its predecessor.
pub const GRADED_RATIO: f64 = 0.95;

/// Absolute local-error tolerance for the adaptive rest integration.
pub const ADAPTIVE_ABS_TOL: f64 = 1e-12;

/// Relative local-error tolerance for the adaptive rest integration.
pub const ADAPTIVE_REL_TOL: f64 = 1e-12;

/// Sampling interval (time units) of the rest-state bank probed by the
/// recovery bisection. Recovery times are reported as multiples of it.
pub const REST_SAMPLE_DT: f64 = 0.01;

/// Machine-level tolerance for analytical comparisons in tests and
/// validation binaries (f64 carries ~15.9 significant digits; 1e-12
/// allows a few digits of accumulated rounding).
pub const ANALYTICAL_F64: f64 = 1e-12;

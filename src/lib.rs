// SPDX-License-Identifier: AGPL-3.0-or-later
//! habiscan — habituation dynamics of small signaling circuits.
//!
//! Simulates nonlinear ODE models of biological signaling circuits
//! (incoherent feed-forward loops, receptor-adaptation variants) under
//! square-wave pulsed stimulation, and measures how robust their
//! qualitative behaviors are to parameter perturbation:
//!
//! - [`habituation`] — pulsed ON/OFF integration until per-cycle response
//!   peaks converge (the circuit has habituated)
//! - [`recovery`] — bisection over rest duration until a fresh pulse
//!   again elicits a near-original response
//! - [`score`] — intensity/frequency discrimination over a grid of
//!   stimulus periods and amplitudes
//! - [`sensitivity`] — per-parameter log-scale bisection for the largest
//!   fold-change that preserves qualification
//!
//! Circuit topologies live in [`circuit`]; each provides the same
//! stimulated/unstimulated vector-field pair behind one trait, so the
//! integration machinery is written once.

pub mod circuit;
pub mod error;
pub mod habituation;
pub mod io;
pub mod ode;
pub mod recovery;
pub mod score;
pub mod sensitivity;
pub mod tolerances;
pub mod validation;

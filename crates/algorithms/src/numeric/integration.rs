//! Trapezoid, Simpson and Romberg quadrature over a closed interval
//!
//! All three refine the same extended trapezoid rule, doubling the number of
//! interior points per level. Refinement stops at a relative change below
//! [`TOLERANCE`] or after [`MAX_LEVELS`] levels, which is reported as
//! [`Error::NoConvergence`].

use flowrouting_core::{Error, Result};

/// Relative accuracy requested from every routine
pub const TOLERANCE: f64 = 1.0e-5;

/// Refinement levels before giving up; level `j` uses `2^(j-2)` new points
pub const MAX_LEVELS: usize = 20;

/// Levels always computed by `qtrap` and `qsimp` before testing convergence
const MIN_LEVELS: usize = 6;

/// Points in the Romberg extrapolation; order `2K`
const ROMBERG_POINTS: usize = 5;

/// Successively refined extended trapezoid rule on `[a, b]`.
///
/// The first call to [`refine`](Self::refine) returns the two-point
/// estimate; each later call adds the midpoints of the previous level.
#[derive(Debug, Clone)]
pub struct TrapezoidRule {
    a: f64,
    b: f64,
    level: usize,
    estimate: f64,
}

impl TrapezoidRule {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            level: 0,
            estimate: 0.0,
        }
    }

    /// Number of refinements done so far
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Advance one level and return the new estimate
    pub fn refine(&mut self, f: &impl Fn(f64) -> f64) -> f64 {
        let (a, b) = (self.a, self.b);
        self.level += 1;
        if self.level == 1 {
            self.estimate = 0.5 * (b - a) * (f(a) + f(b));
            return self.estimate;
        }

        let new_points = 1usize << (self.level - 2);
        let del = (b - a) / new_points as f64;
        let sum: f64 = (0..new_points)
            .map(|j| f(a + (j as f64 + 0.5) * del))
            .sum();
        self.estimate = 0.5 * (self.estimate + (b - a) * sum / new_points as f64);
        self.estimate
    }
}

fn converged(s: f64, previous: f64) -> bool {
    (s - previous).abs() < TOLERANCE * previous.abs() || (s == 0.0 && previous == 0.0)
}

/// Integrate `f` over `[a, b]` with the trapezoid rule
pub fn qtrap(f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64> {
    let mut rule = TrapezoidRule::new(a, b);
    let mut previous = f64::NAN;
    for level in 1..=MAX_LEVELS {
        let s = rule.refine(&f);
        if level >= MIN_LEVELS && converged(s, previous) {
            return Ok(s);
        }
        previous = s;
    }
    Err(Error::NoConvergence {
        routine: "qtrap",
        steps: MAX_LEVELS,
    })
}

/// Integrate `f` over `[a, b]` with Simpson's rule
pub fn qsimp(f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64> {
    let mut rule = TrapezoidRule::new(a, b);
    let (mut previous, mut previous_trap) = (0.0, 0.0);
    for level in 1..=MAX_LEVELS {
        let st = rule.refine(&f);
        let s = (4.0 * st - previous_trap) / 3.0;
        if level >= MIN_LEVELS && converged(s, previous) {
            return Ok(s);
        }
        previous = s;
        previous_trap = st;
    }
    Err(Error::NoConvergence {
        routine: "qsimp",
        steps: MAX_LEVELS,
    })
}

/// Romberg integration of `f` over `[a, b]`.
///
/// Trapezoid estimates at step sizes `h, h/2, h/4, ...` are extrapolated to
/// `h = 0` as a polynomial in `h²` through the last five levels.
pub fn qromb(f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64> {
    let mut rule = TrapezoidRule::new(a, b);
    let mut h = Vec::with_capacity(MAX_LEVELS);
    let mut s = Vec::with_capacity(MAX_LEVELS);
    let mut step = 1.0;

    for level in 1..=MAX_LEVELS {
        h.push(step);
        s.push(rule.refine(&f));
        if level >= ROMBERG_POINTS {
            let from = level - ROMBERG_POINTS;
            let (value, error) = polint(&h[from..], &s[from..], 0.0)?;
            if error.abs() <= TOLERANCE * value.abs() {
                return Ok(value);
            }
        }
        // Step halves, so h² quarters
        step *= 0.25;
    }
    Err(Error::NoConvergence {
        routine: "qromb",
        steps: MAX_LEVELS,
    })
}

/// Neville interpolation: value at `x` of the polynomial through `(xa, ya)`,
/// with the last correction as error estimate.
///
/// Fails on mismatched or empty inputs and on repeated abscissae.
pub fn polint(xa: &[f64], ya: &[f64], x: f64) -> Result<(f64, f64)> {
    let n = xa.len();
    if n == 0 || ya.len() != n {
        return Err(Error::invalid_parameter(
            "polint",
            format!("{} abscissae, {} ordinates", n, ya.len()),
            "need matching non-empty tables",
        ));
    }

    let mut c = ya.to_vec();
    let mut d = ya.to_vec();

    // Start from the table entry closest to x
    let mut ns = xa
        .iter()
        .enumerate()
        .min_by(|(_, p), (_, q)| (x - **p).abs().total_cmp(&(x - **q).abs()))
        .map_or(0, |(i, _)| i);

    let mut y = ya[ns];
    let mut dy = 0.0;

    for m in 1..n {
        for i in 0..n - m {
            let ho = xa[i] - x;
            let hp = xa[i + m] - x;
            let den = ho - hp;
            if den == 0.0 {
                return Err(Error::invalid_parameter(
                    "polint",
                    xa[i],
                    "abscissae must be distinct",
                ));
            }
            let w = (c[i + 1] - d[i]) / den;
            d[i] = hp * w;
            c[i] = ho * w;
        }
        // Take the straightest path through the tableau
        dy = if 2 * ns < n - m {
            c[ns]
        } else {
            ns -= 1;
            d[ns]
        };
        y += dy;
    }

    Ok((y, dy))
}

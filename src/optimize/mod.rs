//! One-dimensional derivative-free minimization
//!
//! This module provides the downhill bracket search and Brent's method used to
//! invert monotonic distance-redshift relations. Both follow the classic
//! formulations in Numerical Recipes (§10.1 and §10.2), with the default
//! tolerances and iteration limits used by SciPy's `optimize.brent`.

use crate::errors::{CoordinateError, Result};

/// Golden ratio used to magnify bracket steps
const GOLD: f64 = 1.618_034;
/// Golden section fraction (3 - √5) / 2
const CGOLD: f64 = 0.381_966_0;
/// Guards the parabolic extrapolation against division by zero
const VERY_SMALL: f64 = 1e-21;
/// Absolute floor on the convergence tolerance
const MIN_TOL: f64 = 1e-11;

/// Default relative tolerance on the abscissa
pub const DEFAULT_TOL: f64 = 1.48e-8;
/// Default iteration limit of Brent's method
pub const DEFAULT_MAX_ITER: usize = 500;
/// Maximum parabolic step as a multiple of the current bracket width
const GROW_LIMIT: f64 = 110.0;
/// Iteration limit of the bracket search
const BRACKET_MAX_ITER: usize = 1000;

/// Three abscissae with `f(b)` lower than both `f(a)` and `f(c)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub fa: f64,
    pub fb: f64,
    pub fc: f64,
    /// Function evaluations spent finding the bracket
    pub evaluations: usize,
}

/// Outcome of a minimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Abscissa of the minimum
    pub x: f64,
    /// Function value at `x`
    pub fx: f64,
    pub iterations: usize,
    /// Total function evaluations including the bracket search
    pub evaluations: usize,
    /// False when the iteration limit was hit before the tolerance was met
    pub converged: bool,
}

/// Search downhill from `xa` and `xb` for a bracket around a minimum of `f`
///
/// Steps grow by the golden ratio, accelerated by parabolic extrapolation
/// limited to `GROW_LIMIT` times the current step.
pub fn bracket(f: impl Fn(f64) -> f64, xa: f64, xb: f64) -> Result<Bracket> {
    let (mut xa, mut xb) = (xa, xb);
    let mut fa = f(xa);
    let mut fb = f(xb);
    if fa < fb {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut xc = xb + GOLD * (xb - xa);
    let mut fc = f(xc);
    let mut evaluations = 3;
    let mut iter = 0;

    while fc < fb {
        if !(xc.is_finite() && fc.is_finite()) {
            return Err(CoordinateError::Optimization(
                "function decreases without bound; no minimum to bracket".to_string(),
            ));
        }
        let tmp1 = (xb - xa) * (fb - fc);
        let tmp2 = (xb - xc) * (fb - fa);
        let val = tmp2 - tmp1;
        let denom = if val.abs() < VERY_SMALL {
            2.0 * VERY_SMALL
        } else {
            2.0 * val
        };
        let mut w = xb - ((xb - xc) * tmp2 - (xb - xa) * tmp1) / denom;
        let wlim = xb + GROW_LIMIT * (xc - xb);
        if iter > BRACKET_MAX_ITER {
            return Err(CoordinateError::Optimization(
                "too many iterations while bracketing the minimum".to_string(),
            ));
        }
        iter += 1;

        let mut fw;
        if (w - xc) * (xb - w) > 0.0 {
            // Parabolic point lies between b and c
            fw = f(w);
            evaluations += 1;
            if fw < fc {
                return Ok(Bracket {
                    a: xb,
                    b: w,
                    c: xc,
                    fa: fb,
                    fb: fw,
                    fc,
                    evaluations,
                });
            } else if fw > fb {
                return Ok(Bracket {
                    a: xa,
                    b: xb,
                    c: w,
                    fa,
                    fb,
                    fc: fw,
                    evaluations,
                });
            }
            w = xc + GOLD * (xc - xb);
            fw = f(w);
            evaluations += 1;
        } else if (w - wlim) * (wlim - xc) >= 0.0 {
            w = wlim;
            fw = f(w);
            evaluations += 1;
        } else if (w - wlim) * (xc - w) > 0.0 {
            fw = f(w);
            evaluations += 1;
            if fw < fc {
                xb = xc;
                xc = w;
                w = xc + GOLD * (xc - xb);
                fb = fc;
                fc = fw;
                fw = f(w);
                evaluations += 1;
            }
        } else {
            w = xc + GOLD * (xc - xb);
            fw = f(w);
            evaluations += 1;
        }

        xa = xb;
        xb = xc;
        xc = w;
        fa = fb;
        fb = fc;
        fc = fw;
    }

    Ok(Bracket {
        a: xa,
        b: xb,
        c: xc,
        fa,
        fb,
        fc,
        evaluations,
    })
}

/// Minimize `f` with Brent's method, bracketing from `(0, 1)`
///
/// No bounds are imposed: the minimum found is whichever one the downhill
/// bracket search reaches first.
pub fn brent(f: impl Fn(f64) -> f64) -> Result<Minimum> {
    let start = bracket(&f, 0.0, 1.0)?;
    Ok(brent_in(&f, &start, DEFAULT_TOL, DEFAULT_MAX_ITER))
}

/// Brent's method inside an existing bracket
pub fn brent_in(f: impl Fn(f64) -> f64, bracket: &Bracket, tol: f64, max_iter: usize) -> Minimum {
    let (mut a, mut b) = if bracket.a < bracket.c {
        (bracket.a, bracket.c)
    } else {
        (bracket.c, bracket.a)
    };
    let (mut x, mut w, mut v) = (bracket.b, bracket.b, bracket.b);
    let (mut fx, mut fw, mut fv) = (bracket.fb, bracket.fb, bracket.fb);
    let mut deltax: f64 = 0.0;
    let mut rat: f64 = 0.0;
    let mut evaluations = bracket.evaluations;
    let mut iter = 0;
    let mut converged = false;

    while iter < max_iter {
        let tol1 = tol * x.abs() + MIN_TOL;
        let tol2 = 2.0 * tol1;
        let xmid = 0.5 * (a + b);
        if (x - xmid).abs() < tol2 - 0.5 * (b - a) {
            converged = true;
            break;
        }

        if deltax.abs() <= tol1 {
            deltax = if x >= xmid { a - x } else { b - x };
            rat = CGOLD * deltax;
        } else {
            let tmp1 = (x - w) * (fx - fv);
            let mut tmp2 = (x - v) * (fx - fw);
            let mut p = (x - v) * tmp2 - (x - w) * tmp1;
            tmp2 = 2.0 * (tmp2 - tmp1);
            if tmp2 > 0.0 {
                p = -p;
            }
            tmp2 = tmp2.abs();
            let dx_temp = deltax;
            deltax = rat;

            if p > tmp2 * (a - x) && p < tmp2 * (b - x) && p.abs() < (0.5 * tmp2 * dx_temp).abs() {
                // Parabolic step
                rat = p / tmp2;
                let u = x + rat;
                if (u - a) < tol2 || (b - u) < tol2 {
                    rat = if xmid - x >= 0.0 { tol1 } else { -tol1 };
                }
            } else {
                // Golden section step
                deltax = if x >= xmid { a - x } else { b - x };
                rat = CGOLD * deltax;
            }
        }

        let u = if rat.abs() < tol1 {
            if rat >= 0.0 {
                x + tol1
            } else {
                x - tol1
            }
        } else {
            x + rat
        };
        let fu = f(u);
        evaluations += 1;

        if fu > fx {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        } else {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        }

        iter += 1;
    }

    Minimum {
        x,
        fx,
        iterations: iter,
        evaluations,
        converged,
    }
}

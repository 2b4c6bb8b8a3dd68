// SPDX-License-Identifier: AGPL-3.0-only

//! Euclidean Dirac matrices in the chiral basis.
//!
//! In 2×2 block form:
//!
//!   γ\_t = [[0, 1], [1, 0]],   γ\_k = [[0, -iσ\_k], [iσ\_k, 0]],
//!   γ5 = γ\_1 γ\_2 γ\_3 γ\_t = diag(1, 1, -1, -1)
//!
//! Direction 0 is time, so `gamma(0)` is γ\_t and `gamma(k)` is γ\_k.
//! Because γ5 is diagonal, multiplying a spinor by γ5 only flips the sign of
//! spin components 2 and 3, and the chiral projectors P± = (1 ± γ5)/2 select
//! spin pairs {0, 1} and {2, 3}.
//!
//! # References
//!
//! - Gattringer & Lang, "QCD on the Lattice" (2010), App. A.2

use std::ops::{Add, Mul, Sub};

use super::complex_f64::Complex64;
use super::constants::{N_COLORS, N_DIM, N_SPINS, SPINOR_COMPONENTS};

const O: Complex64 = Complex64::ZERO;
const P: Complex64 = Complex64::ONE;
const M: Complex64 = Complex64::new(-1.0, 0.0);
const PI: Complex64 = Complex64::I;
const MI: Complex64 = Complex64::new(0.0, -1.0);

/// 4×4 complex matrix acting on spin indices.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct SpinMatrix {
    /// Matrix elements m[row][col].
    pub m: [[Complex64; N_SPINS]; N_SPINS],
}

impl SpinMatrix {
    /// 4×4 identity.
    pub const IDENTITY: Self = Self {
        m: [[P, O, O, O], [O, P, O, O], [O, O, P, O], [O, O, O, P]],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self {
        m: [[O; N_SPINS]; N_SPINS],
    };

    /// Conjugate transpose.
    pub fn adjoint(self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..N_SPINS {
            for j in 0..N_SPINS {
                r.m[i][j] = self.m[j][i].conj();
            }
        }
        r
    }

    /// Scale by a real number.
    pub fn scale(self, s: f64) -> Self {
        let mut r = self;
        for row in &mut r.m {
            for c in row.iter_mut() {
                *c = c.scale(s);
            }
        }
        r
    }

    /// Largest elementwise |difference| to another matrix.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let mut worst = 0.0_f64;
        for i in 0..N_SPINS {
            for j in 0..N_SPINS {
                worst = worst.max((self.m[i][j] - other.m[i][j]).abs());
            }
        }
        worst
    }
}

impl Mul for SpinMatrix {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..N_SPINS {
            for j in 0..N_SPINS {
                let mut s = Complex64::ZERO;
                for k in 0..N_SPINS {
                    s += self.m[i][k] * rhs.m[k][j];
                }
                r.m[i][j] = s;
            }
        }
        r
    }
}

impl Add for SpinMatrix {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut r = self;
        for i in 0..N_SPINS {
            for j in 0..N_SPINS {
                r.m[i][j] += rhs.m[i][j];
            }
        }
        r
    }
}

impl Sub for SpinMatrix {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut r = self;
        for i in 0..N_SPINS {
            for j in 0..N_SPINS {
                r.m[i][j] -= rhs.m[i][j];
            }
        }
        r
    }
}

/// γ\_t
pub const GAMMA_T: SpinMatrix = SpinMatrix {
    m: [[O, O, P, O], [O, O, O, P], [P, O, O, O], [O, P, O, O]],
};

/// γ\_x = [[0, -iσ\_1], [iσ\_1, 0]]
pub const GAMMA_X: SpinMatrix = SpinMatrix {
    m: [[O, O, O, MI], [O, O, MI, O], [O, PI, O, O], [PI, O, O, O]],
};

/// γ\_y = [[0, -iσ\_2], [iσ\_2, 0]]
pub const GAMMA_Y: SpinMatrix = SpinMatrix {
    m: [[O, O, O, M], [O, O, P, O], [O, P, O, O], [M, O, O, O]],
};

/// γ\_z = [[0, -iσ\_3], [iσ\_3, 0]]
pub const GAMMA_Z: SpinMatrix = SpinMatrix {
    m: [[O, O, MI, O], [O, O, O, PI], [PI, O, O, O], [O, MI, O, O]],
};

/// γ5 = diag(1, 1, -1, -1)
pub const GAMMA5: SpinMatrix = SpinMatrix {
    m: [[P, O, O, O], [O, P, O, O], [O, O, M, O], [O, O, O, M]],
};

/// Dirac matrix for lattice direction `mu` (0 = time).
pub fn gamma(mu: usize) -> SpinMatrix {
    match mu {
        0 => GAMMA_T,
        1 => GAMMA_X,
        2 => GAMMA_Y,
        3 => GAMMA_Z,
        _ => panic!("gamma index {mu} out of range 0..{N_DIM}"),
    }
}

/// Sign that γ5 puts on spin component `spin`.
#[inline]
#[must_use]
pub const fn gamma5_sign(spin: usize) -> f64 {
    if spin < N_SPINS / 2 {
        1.0
    } else {
        -1.0
    }
}

/// γ5 ψ for a flat spinor addressed `12*site + 3*spin + color`.
///
/// Applying it twice returns the input exactly.
#[must_use]
pub fn multiply_gamma5(psi: &[Complex64]) -> Vec<Complex64> {
    psi.iter()
        .enumerate()
        .map(|(i, &z)| {
            let spin = (i % SPINOR_COMPONENTS) / N_COLORS;
            if gamma5_sign(spin) < 0.0 {
                -z
            } else {
                z
            }
        })
        .collect()
}

/// Chirality selected by a projector P± = (1 ± γ5)/2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chirality {
    /// P+ keeps spins 0 and 1.
    Plus,
    /// P- keeps spins 2 and 3.
    Minus,
}

impl Chirality {
    /// Whether `spin` survives this projector.
    #[inline]
    #[must_use]
    pub const fn keeps(self, spin: usize) -> bool {
        match self {
            Self::Plus => spin < N_SPINS / 2,
            Self::Minus => spin >= N_SPINS / 2,
        }
    }

    /// The projector as a spin matrix.
    pub fn projector(self) -> SpinMatrix {
        let sign = match self {
            Self::Plus => 1.0,
            Self::Minus => -1.0,
        };
        (SpinMatrix::IDENTITY + GAMMA5.scale(sign)).scale(0.5)
    }
}

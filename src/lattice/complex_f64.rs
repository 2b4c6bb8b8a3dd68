// SPDX-License-Identifier: AGPL-3.0-only

//! Complex f64 arithmetic for lattice fields.
//!
//! Plain `(re, im)` pair with the operator set the stencil loops need:
//! complex-complex arithmetic, real scaling, and the compound-assignment
//! forms so site stores of `Complex64` support in-place elementwise updates.
//! Serializable so boundary phases can live in JSON configs.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Complex number with f64 real and imaginary parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex64 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex64 {
    /// 0 + 0i
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// 1 + 0i
    pub const ONE: Self = Self::new(1.0, 0.0);
    /// 0 + 1i
    pub const I: Self = Self::new(0.0, 1.0);

    /// `re + i im`
    #[inline]
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Purely real value.
    #[inline]
    #[must_use]
    pub const fn real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    /// Complex conjugate.
    #[inline]
    #[must_use]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// |z|²
    #[inline]
    #[must_use]
    pub fn abs_sq(self) -> f64 {
        self.re.mul_add(self.re, self.im * self.im)
    }

    /// |z|
    #[inline]
    #[must_use]
    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Unit phase e^{iθ}.
    #[inline]
    #[must_use]
    pub fn from_polar(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, sin)
    }

    /// Multiply by a real factor.
    #[inline]
    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }

    /// Integer power by repeated squaring. `powi(0)` is one.
    #[must_use]
    pub fn powi(self, n: u32) -> Self {
        let mut base = self;
        let mut acc = Self::ONE;
        let mut e = n;
        while e > 0 {
            if e & 1 == 1 {
                acc *= base;
            }
            base *= base;
            e >>= 1;
        }
        acc
    }

    /// True when both parts are exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

impl From<f64> for Complex64 {
    fn from(re: f64) -> Self {
        Self::real(re)
    }
}

/// `Op<Complex64>` from an expression over `(a, b)`, plus `OpAssign` via the
/// binary form.
macro_rules! complex_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, |$a:ident, $b:ident| $body:expr) => {
        impl $op for Complex64 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                let ($a, $b) = (self, rhs);
                $body
            }
        }

        impl $op_assign for Complex64 {
            #[inline]
            fn $method_assign(&mut self, rhs: Self) {
                *self = $op::$method(*self, rhs);
            }
        }
    };
}

complex_op!(Add, add, AddAssign, add_assign, |a, b| Complex64::new(a.re + b.re, a.im + b.im));
complex_op!(Sub, sub, SubAssign, sub_assign, |a, b| Complex64::new(a.re - b.re, a.im - b.im));
complex_op!(Mul, mul, MulAssign, mul_assign, |a, b| Complex64::new(
    a.re * b.re - a.im * b.im,
    a.re * b.im + a.im * b.re
));
complex_op!(Div, div, DivAssign, div_assign, |a, b| {
    let d = b.abs_sq();
    Complex64::new(
        (a.re * b.re + a.im * b.im) / d,
        (a.im * b.re - a.re * b.im) / d,
    )
});

/// Real right-hand side: applied to both parts.
macro_rules! complex_real_op {
    ($($op:ident, $method:ident, $op_assign:ident, $method_assign:ident);+ $(;)?) => {
        $(
            impl $op<f64> for Complex64 {
                type Output = Self;

                #[inline]
                fn $method(self, rhs: f64) -> Self {
                    Self::new($op::$method(self.re, rhs), $op::$method(self.im, rhs))
                }
            }

            impl $op_assign<f64> for Complex64 {
                #[inline]
                fn $method_assign(&mut self, rhs: f64) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )+
    };
}

complex_real_op!(
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
);

impl Add<f64> for Complex64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self::new(self.re + rhs, self.im)
    }
}

impl AddAssign<f64> for Complex64 {
    #[inline]
    fn add_assign(&mut self, rhs: f64) {
        self.re += rhs;
    }
}

impl Sub<f64> for Complex64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.re - rhs, self.im)
    }
}

impl SubAssign<f64> for Complex64 {
    #[inline]
    fn sub_assign(&mut self, rhs: f64) {
        self.re -= rhs;
    }
}

impl Neg for Complex64 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl Sum for Complex64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, z| acc + z)
    }
}

impl fmt::Display for Complex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "{:.6}{sign}{:.6}i", self.re, self.im.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    #[test]
    fn field_axioms_on_samples() {
        let a = Complex64::new(1.0, 2.0);
        let b = Complex64::new(3.0, 4.0);
        assert_eq!(a + b, Complex64::new(4.0, 6.0));
        assert_eq!(a - b, Complex64::new(-2.0, -2.0));
        assert_eq!(a * b, Complex64::new(-5.0, 10.0));
        assert!(((a / b) * b - a).abs() < TOL);
        assert_eq!(-a + a, Complex64::ZERO);
        assert_eq!(Complex64::I * Complex64::I, Complex64::real(-1.0));
    }

    #[test]
    fn conjugate_product_is_modulus() {
        let z = Complex64::new(3.0, -4.0);
        assert_eq!(z * z.conj(), Complex64::real(25.0));
        assert!((z.abs() - 5.0).abs() < TOL);
    }

    #[test]
    fn compound_assign_matches_binary() {
        let mut z = Complex64::new(0.5, -1.5);
        let w = Complex64::new(2.0, 0.25);
        let expected = (z + w) * w / w - w;
        z += w;
        z *= w;
        z /= w;
        z -= w;
        assert!((z - expected).abs() < TOL);
    }

    #[test]
    fn real_operands_touch_the_right_parts() {
        let mut z = Complex64::new(1.0, -2.0);
        assert_eq!(z + 1.0, Complex64::new(2.0, -2.0));
        assert_eq!(z * 2.0, Complex64::new(2.0, -4.0));
        assert_eq!(z / 2.0, Complex64::new(0.5, -1.0));
        z -= 1.0;
        z *= -1.0;
        assert_eq!(z, Complex64::new(-0.0, 2.0));
    }

    #[test]
    fn powi_of_minus_one_alternates() {
        let m = Complex64::real(-1.0);
        for n in 0..6 {
            let want = if n % 2 == 0 { Complex64::ONE } else { m };
            assert_eq!(m.powi(n), want, "(-1)^{n}");
        }
    }

    #[test]
    fn powi_of_unit_phase_adds_angles() {
        let z3 = Complex64::from_polar(0.3).powi(3);
        assert!((z3 - Complex64::from_polar(0.9)).abs() < TOL);
    }

    #[test]
    fn display_handles_negative_imaginary() {
        assert_eq!(Complex64::new(1.0, -0.5).to_string(), "1.000000-0.500000i");
        assert_eq!(Complex64::I.to_string(), "0.000000+1.000000i");
    }

    #[test]
    fn json_representation_is_re_im_object() {
        let z: Complex64 = serde_json::from_str(r#"{"re": -1.0, "im": 0.5}"#).unwrap();
        assert_eq!(z, Complex64::new(-1.0, 0.5));
        let total: Complex64 = [z, z.conj()].into_iter().sum();
        assert_eq!(total, Complex64::real(-2.0));
    }
}

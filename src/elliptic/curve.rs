use fp2::traits::Fp as FqTrait;

use super::point::PointX;

/// Curve y^2 = x^3 + A*x^2 + x, for a given constant A
/// (special case of a Montgomery curve). Only x-only arithmetic is
/// provided, with (A + 2) / 4 precomputed for the ladder.
#[derive(Clone, Copy, Debug)]
pub struct Curve<Fq: FqTrait> {
    pub A: Fq,   // A
    pub A24: Fq, // (A+2)/4
}

impl<Fq: FqTrait> Curve<Fq> {
    /// Create a new curve instance, with the provided constant.
    pub fn new(A: &Fq) -> Self {
        // We check that the curve is not singular, i.e. A^2 != 4.
        let a = *A;
        assert!(a.equals(&<Fq>::TWO) == 0);
        assert!((a + <Fq>::TWO).is_zero() == 0);

        Self {
            A: a,
            A24: (a + <Fq>::TWO) / <Fq>::FOUR,
        }
    }

    /// Recover the affine curve from the projective constants
    /// (A24 : C24) = (A + 2C : 4C) used by the isogeny formulae.
    pub fn curve_from_A24_proj(A24: &Fq, C24: &Fq) -> Self {
        let mut A = A24.mul2();
        A -= *C24;
        A.set_mul2();
        A /= *C24;
        Self::new(&A)
    }

    /// As `curve_from_A24_proj`, but returns None instead of panicking when
    /// the constants describe a singular curve or C24 = 0.
    pub fn try_from_A24_proj(A24: &Fq, C24: &Fq) -> Option<Self> {
        if C24.is_zero() == u32::MAX {
            return None;
        }
        let mut A = A24.mul2();
        A -= *C24;
        A.set_mul2();
        A /= *C24;
        if (A.square() - Fq::FOUR).is_zero() == u32::MAX {
            return None;
        }
        Some(Self::new(&A))
    }

    /// The projective constants (A + 2 : 4) for this curve.
    pub fn A24_proj(&self) -> (Fq, Fq) {
        (self.A + Fq::TWO, Fq::FOUR)
    }

    /// Return the j-invariant 256 * (A^2 - 3)^3 / (A^2 - 4).
    pub fn j_invariant(&self) -> Fq {
        let AA = self.A.square();
        let mut num = AA - Fq::THREE;
        num = num.square() * num;
        num.set_mul_small(256);
        num / (AA - Fq::FOUR)
    }

    /// Return 0xFFFFFFFF if the x-coordinate (X : Z) belongs to a point
    /// defined over the base field, i.e. X*Z*(X^2 + A*X*Z + Z^2) is a square.
    /// The point at infinity is always on the curve.
    pub fn is_on_curve(&self, P: &PointX<Fq>) -> u32 {
        if P.is_zero() == u32::MAX {
            return u32::MAX;
        }
        let XZ = P.X * P.Z;
        let mut t = P.X.square() + P.Z.square() + self.A * XZ;
        t *= XZ;
        t.set_sqrt()
    }

    /// Return 0xFFFFFFFF if both curves have the same Montgomery coefficient.
    pub fn equals(&self, other: &Self) -> u32 {
        self.A.equals(&other.A)
    }

    /// Return 0xFFFFFFFF if both curves are isomorphic over the algebraic closure.
    pub fn is_isomorphic(&self, other: &Self) -> u32 {
        self.j_invariant().equals(&other.j_invariant())
    }
}

impl<Fq: FqTrait> ::std::fmt::Display for Curve<Fq> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "Elliptic Curve: y^2 = x^3 + ({})*x^2 + x", self.A)
    }
}

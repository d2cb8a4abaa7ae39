use fp2::traits::Fp as FpTrait;
use rand_core::{CryptoRng, RngCore};

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::{
    fmt::Display,
    ops::{Index, IndexMut},
};

/// Below this length multiplication is done with the schoolbook method.
const KARATSUBA_THRESHOLD: usize = 4;

/// Trait for arithmetic for univariate polynomials in Fp[X]
pub trait Poly<Fp: FpTrait>:
    Clone
    + Default
    + Display
    + Index<usize, Output = Fp>
    + IndexMut<usize>
    + Sized
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + MulAssign<Self>
    + MulAssign<Fp>
{
    fn new_from_ele(a: &Fp) -> Self;
    fn new_from_slice(a: &[Fp]) -> Self;
    fn one() -> Self;
    fn set_from_slice(&mut self, a: &[Fp]);

    fn coeffs(&self) -> &[Fp];
    fn len(&self) -> usize;
    fn degree(&self) -> Option<usize>;
    fn leading_coefficient(&self) -> Option<Fp>;
    fn constant_coefficient(&self) -> Option<Fp>;
    fn is_constant(&self) -> bool;

    fn reverse(&self) -> Self;
    fn truncated(&self, n: usize) -> Self;

    fn scale(&self, a: &Fp) -> Self;
    fn multiply(&self, other: &Self) -> Self;

    fn inverse_series(&self, n: usize) -> Self;
    fn div_rem(&self, divisor: &Self) -> (Self, Self);
    fn remainder(&self, modulus: &Self) -> Self;
    fn middle_product(f: &[Fp], g: &[Fp]) -> Self;

    fn evaluate(&self, a: &Fp) -> Fp;

    fn product_tree_root(v: &[Self]) -> Self;

    fn resultant(&self, other: &Self) -> Fp;
    fn resultant_from_roots(&self, ai: &[Fp]) -> Fp;
}

#[derive(Clone, Debug)]
pub struct Polynomial<Fp: FpTrait> {
    pub(crate) coeffs: Vec<Fp>,
}

impl<Fp: FpTrait> Polynomial<Fp> {
    /// Create a polynomial from a finite field element.
    pub fn new_from_ele(a: &Fp) -> Self {
        Self { coeffs: vec![*a] }
    }

    /// Create a polynomial from a slice of finite field elements, given
    /// from the constant coefficient upwards.
    pub fn new_from_slice(a: &[Fp]) -> Self {
        if a.is_empty() {
            return Self::zero();
        }
        Self { coeffs: a.to_vec() }
    }

    /// Set the coefficients of a polynomial from a slice
    pub fn set_from_slice(&mut self, a: &[Fp]) {
        self.coeffs.clear();
        self.coeffs.extend_from_slice(a);
        if self.coeffs.is_empty() {
            self.coeffs.push(Fp::ZERO);
        }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self {
            coeffs: vec![Fp::ZERO],
        }
    }

    /// The constant polynomial 1.
    pub fn one() -> Self {
        Self {
            coeffs: vec![Fp::ONE],
        }
    }

    /// The monic linear polynomial x - r.
    pub fn from_root(r: &Fp) -> Self {
        Self {
            coeffs: vec![-*r, Fp::ONE],
        }
    }

    /// The monic polynomial prod(x - r_i).
    pub fn from_roots(roots: &[Fp]) -> Self {
        let linear: Vec<Self> = roots.iter().map(Self::from_root).collect();
        if linear.is_empty() {
            return Self::one();
        }
        Self::product_tree_root(&linear)
    }

    /// The stored coefficients, which may include zeros above the degree.
    pub fn coeffs(&self) -> &[Fp] {
        &self.coeffs
    }

    /// The number of stored coefficients.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Drop zero coefficients above the degree, keeping at least one
    /// coefficient.
    pub fn trim(&mut self) {
        let len = self.degree().map_or(1, |d| d + 1);
        self.coeffs.truncate(len);
        if self.coeffs.is_empty() {
            self.coeffs.push(Fp::ZERO);
        }
    }

    /// Return the degree of the polynomial, ignoring zero coefficients
    /// above the degree, or None for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs
            .iter()
            .rposition(|c| c.is_zero() != u32::MAX)
    }

    /// Return the coefficient of the highest non-zero term.
    pub fn leading_coefficient(&self) -> Option<Fp> {
        self.degree().map(|d| self.coeffs[d])
    }

    /// Return the constant coefficient of the polynomial
    pub fn constant_coefficient(&self) -> Option<Fp> {
        self.coeffs.first().copied()
    }

    /// Return true when the polynomial has degree zero (or is zero).
    pub fn is_constant(&self) -> bool {
        self.degree().is_none_or(|d| d == 0)
    }

    /// Reverse the coefficients of self in place.
    fn reverse_into(&mut self) {
        self.coeffs.reverse();
    }

    /// Return the polynomial with coefficents reversed.
    pub fn reverse(&self) -> Self {
        let mut r = self.clone();
        r.reverse_into();
        r
    }

    /// Return self mod x^n, always with exactly n stored coefficients.
    pub fn truncated(&self, n: usize) -> Self {
        let mut coeffs = vec![Fp::ZERO; n.max(1)];
        let k = n.min(self.len());
        coeffs[..k].copy_from_slice(&self.coeffs[..k]);
        Self { coeffs }
    }

    /// Return 0xFFFFFFFF if self and other represent the same polynomial.
    /// Otherwise, return 0x00000000. Zero coefficients above the degree
    /// are ignored.
    pub fn equals(&self, other: &Self) -> u32 {
        let mut equals = u32::MAX;
        for i in 0..self.len().max(other.len()) {
            let a = self.coeffs.get(i).copied().unwrap_or(Fp::ZERO);
            let b = other.coeffs.get(i).copied().unwrap_or(Fp::ZERO);
            equals &= a.equals(&b);
        }
        equals
    }

    /// Return 0xFFFFFFFF if self is zero, otherwise, return 0x00000000.
    pub fn is_zero(&self) -> u32 {
        let mut is_zero = u32::MAX;
        for i in 0..self.len() {
            is_zero &= self.coeffs[i].is_zero();
        }
        is_zero
    }

    /// Compute f <-- f + g, assumes that f is at least as long as g.
    pub(crate) fn add_into(f: &mut [Fp], g: &[Fp]) {
        debug_assert!(f.len() >= g.len());
        for i in 0..g.len() {
            f[i] += g[i];
        }
    }

    /// Compute f <-- f - g, assumes that f is at least as long as g.
    pub(crate) fn sub_into(f: &mut [Fp], g: &[Fp]) {
        debug_assert!(f.len() >= g.len());
        for i in 0..g.len() {
            f[i] -= g[i];
        }
    }

    /// Compute f * g with O(len(f) * len(g)) Fp multiplications using
    /// schoolbook multiplication. Assumes that fg has enough space for
    /// the result (len(f) + len(g) - 1).
    fn schoolbook_multiplication(fg: &mut [Fp], f: &[Fp], g: &[Fp]) {
        debug_assert!(fg.len() >= f.len() + g.len() - 1);

        for i in 0..f.len() {
            for j in 0..g.len() {
                if i == 0 || j + 1 == g.len() {
                    fg[i + j] = f[i] * g[j]
                } else {
                    fg[i + j] += f[i] * g[j]
                }
            }
        }
    }

    /// Compute f * g with ~O(n^1.58) Fp multiplications using Karatsuba multiplication.
    /// Assumes that fg has enough space for the result (len(f) + len(g) - 1).
    fn karatsuba_multiplication(fg: &mut [Fp], f: &[Fp], g: &[Fp]) {
        // Ensure that the degree of f is larger or equal to g (for balancing the split later)
        if f.len() < g.len() {
            Self::karatsuba_multiplication(fg, g, f);
            return;
        }

        // If g has length zero, then we set f * g to be zero.
        if g.is_empty() {
            for c in fg.iter_mut() {
                *c = Fp::ZERO;
            }
            return;
        }
        debug_assert!(fg.len() >= f.len() + g.len() - 1);

        // If g has length one we simply scale all coefficients by g0.
        if g.len() == 1 {
            let g0 = g[0];
            for i in 0..f.len() {
                fg[i] = f[i] * g0;
            }
            return;
        }

        if f.len() <= KARATSUBA_THRESHOLD {
            Self::schoolbook_multiplication(fg, f, g);
            return;
        }

        // Split f into a high and low part at floor(f.len() / 2).
        let nf = f.len() / 2;
        let mf = f.len() - nf;

        // When g is particularly small we cannot split g into two halves, so
        // f_lo and f_hi are each multiplied by the whole of g.
        if g.len() <= nf {
            Self::karatsuba_multiplication(&mut fg[..nf + g.len() - 1], &f[..nf], g);

            // f_hi * g has length mf + g.len() - 1. The bottom g.len() - 1
            // elements overlap with f_lo * g, the rest is copied.
            let mut fg_hi = vec![Fp::ZERO; mf + g.len() - 1];
            Self::karatsuba_multiplication(&mut fg_hi, &f[nf..nf + mf], g);
            Self::add_into(&mut fg[nf..nf + g.len() - 1], &fg_hi[..g.len() - 1]);
            fg[nf + g.len() - 1..nf + mf + g.len() - 1].copy_from_slice(&fg_hi[g.len() - 1..]);

            return;
        }

        // Writing f * g = fg_lo + x^nf (fg_mid) + x^2nf (fg_hi):
        //
        // - fg_lo = f_lo * g_lo
        // - fg_mid = (f_lo + f_hi) * (g_lo + g_hi) - f_lo * g_lo - f_hi * g_hi
        // - fg_hi  = f_hi * g_hi
        let mg = g.len() - nf;
        let top = nf + mf + nf + mg - 1;

        Self::karatsuba_multiplication(&mut fg[..nf + nf - 1], &f[..nf], &g[..nf]);
        Self::karatsuba_multiplication(&mut fg[nf + nf..top], &f[nf..], &g[nf..]);

        // As nf is floor(len(f) / 2) then mf will either be nf or nf + 1.
        let mut f_mid = f[nf..].to_vec();
        Self::add_into(&mut f_mid[..nf], &f[..nf]);

        // len(g) <= len(f) so we might have mg < nf.
        let mut g_mid = vec![Fp::ZERO; nf.max(mg)];
        if mg < nf {
            g_mid.copy_from_slice(&g[..nf]);
            Self::add_into(&mut g_mid[..mg], &g[nf..]);
        } else {
            g_mid.copy_from_slice(&g[nf..]);
            Self::add_into(&mut g_mid[..nf], &g[..nf]);
        }

        let mut fg_mid = vec![Fp::ZERO; mf + nf.max(mg) - 1];
        Self::karatsuba_multiplication(&mut fg_mid, &f_mid, &g_mid);

        Self::sub_into(&mut fg_mid[..nf + nf - 1], &fg[..nf + nf - 1]);
        Self::sub_into(&mut fg_mid[..mf + mg - 1], &fg[nf + nf..top]);

        // The single coefficient at 2nf - 1 is not covered by fg_lo or fg_hi.
        fg[nf + nf - 1] = Fp::ZERO;
        Self::add_into(&mut fg[nf..nf + mf + nf.max(mg) - 1], &fg_mid);
    }

    /// Compute fg <- f * g, requires len(fg) >= len(f) + len(g) - 1.
    pub(crate) fn mul_into(fg: &mut [Fp], f: &[Fp], g: &[Fp]) {
        assert!(f.len() + g.len() <= fg.len() + 1);
        Self::karatsuba_multiplication(fg, f, g)
    }

    /// Quadratic reference multiplication.
    pub fn schoolbook_mul(&self, other: &Self) -> Self {
        let mut coeffs = vec![Fp::ZERO; self.len() + other.len() - 1];
        Self::schoolbook_multiplication(&mut coeffs, &self.coeffs, &other.coeffs);
        Self { coeffs }
    }

    pub fn karatsuba_mul(&self, other: &Self) -> Self {
        let mut coeffs = vec![Fp::ZERO; self.len() + other.len() - 1];
        Self::karatsuba_multiplication(&mut coeffs, &self.coeffs, &other.coeffs);
        Self { coeffs }
    }

    /// Set self to it's negative.
    fn set_neg(&mut self) {
        for x in self.coeffs.iter_mut() {
            x.set_neg();
        }
    }

    /// Set self <- self + other
    fn set_add(&mut self, other: &Self) {
        if self.len() < other.len() {
            self.coeffs.resize(other.len(), Fp::ZERO);
        }
        Self::add_into(&mut self.coeffs, &other.coeffs);
    }

    /// Set self <- self - other
    fn set_sub(&mut self, other: &Self) {
        if self.len() < other.len() {
            self.coeffs.resize(other.len(), Fp::ZERO);
        }
        Self::sub_into(&mut self.coeffs, &other.coeffs);
    }

    /// Set self <- self * other
    fn set_mul(&mut self, other: &Self) {
        if self.coeffs.is_empty() || other.coeffs.is_empty() {
            *self = Self::zero();
            return;
        }
        let mut fg_coeffs = vec![Fp::ZERO; self.len() + other.len() - 1];
        Self::mul_into(&mut fg_coeffs, &self.coeffs, &other.coeffs);
        self.coeffs = fg_coeffs;
    }

    /// Multiply all coefficients of the polynomial by a element of the finite field.
    pub fn scale_into(&mut self, c: &Fp) {
        for x in self.coeffs.iter_mut() {
            *x *= *c;
        }
    }

    /// Return  c * self for some c in the finite field.
    pub fn scale(&self, c: &Fp) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.scale_into(c);
        r
    }

    /// Multiply all coefficients of the polynomial by a small value.
    pub fn scale_small_into(&mut self, k: i32) {
        for x in self.coeffs.iter_mut() {
            x.set_mul_small(k);
        }
    }

    /// Return c * self for some small c
    pub fn scale_small(&self, k: i32) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.scale_small_into(k);
        r
    }

    /// Computes the root of a product tree given a slice of the leaves,
    /// without keeping the intermediate nodes.
    pub fn product_tree_root(v: &[Self]) -> Self {
        match v.len() {
            0 => Self::one(),
            1 => v[0].clone(),
            _ => {
                let half = v.len() >> 1;
                &Self::product_tree_root(&v[..half]) * &Self::product_tree_root(&v[half..])
            }
        }
    }

    /// Evaluate a polynomial at a value `a` using Horner's method.
    pub fn evaluate(&self, a: &Fp) -> Fp {
        let Some(deg) = self.degree() else {
            return Fp::ZERO;
        };

        let mut bi = Fp::ZERO;
        for i in 0..=deg {
            bi = *a * bi + self.coeffs[deg - i];
        }
        bi
    }

    /// Compute the resultant of self with a polynomial g = \prod {x - ai}
    /// given the roots ai, as the product of the evaluations self(ai).
    /// Quadratic, see `ProductTree::resultant` for the fast variant.
    pub fn resultant_from_roots(&self, ai: &[Fp]) -> Fp {
        let mut res = Fp::ONE;
        for a in ai.iter() {
            res *= self.evaluate(a);
        }
        res
    }

    /// Set self to a random value
    pub fn set_rand<R: CryptoRng + RngCore>(&mut self, rng: &mut R) {
        for x in self.coeffs.iter_mut() {
            x.set_rand(rng);
        }
    }

    /// Return a new random polynomial with length d
    pub fn rand<R: CryptoRng + RngCore>(rng: &mut R, d: usize) -> Self {
        let mut r = Self {
            coeffs: vec![Fp::ZERO; d.max(1)],
        };
        r.set_rand(rng);
        r
    }

    /// Return a new random monic polynomial of degree d
    pub fn rand_monic<R: CryptoRng + RngCore>(rng: &mut R, d: usize) -> Self {
        let mut r = Self::rand(rng, d + 1);
        r.coeffs[d] = Fp::ONE;
        r
    }
}

impl<Fp: FpTrait> Poly<Fp> for Polynomial<Fp> {
    fn new_from_ele(a: &Fp) -> Self {
        Self::new_from_ele(a)
    }
    fn new_from_slice(a: &[Fp]) -> Self {
        Self::new_from_slice(a)
    }
    fn one() -> Self {
        Self::one()
    }
    fn set_from_slice(&mut self, a: &[Fp]) {
        self.set_from_slice(a)
    }

    fn coeffs(&self) -> &[Fp] {
        self.coeffs()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn degree(&self) -> Option<usize> {
        self.degree()
    }

    fn leading_coefficient(&self) -> Option<Fp> {
        self.leading_coefficient()
    }

    fn constant_coefficient(&self) -> Option<Fp> {
        self.constant_coefficient()
    }

    fn is_constant(&self) -> bool {
        self.is_constant()
    }

    fn reverse(&self) -> Self {
        self.reverse()
    }

    fn truncated(&self, n: usize) -> Self {
        self.truncated(n)
    }

    fn scale(&self, a: &Fp) -> Self {
        self.scale(a)
    }

    fn multiply(&self, other: &Self) -> Self {
        self * other
    }

    fn inverse_series(&self, n: usize) -> Self {
        self.inverse_series(n)
    }

    fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        self.div_rem(divisor)
    }

    fn remainder(&self, modulus: &Self) -> Self {
        self.remainder(modulus)
    }

    fn middle_product(f: &[Fp], g: &[Fp]) -> Self {
        Self::middle_product(f, g)
    }

    fn evaluate(&self, a: &Fp) -> Fp {
        self.evaluate(a)
    }

    fn product_tree_root(v: &[Self]) -> Self {
        Self::product_tree_root(v)
    }

    fn resultant(&self, other: &Self) -> Fp {
        self.resultant(other)
    }

    fn resultant_from_roots(&self, ai: &[Fp]) -> Fp {
        self.resultant_from_roots(ai)
    }
}

impl<Fp: FpTrait> Index<usize> for Polynomial<Fp> {
    type Output = Fp;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coeffs[index]
    }
}

impl<Fp: FpTrait> IndexMut<usize> for Polynomial<Fp> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.coeffs[index]
    }
}

impl<Fp: FpTrait> Default for Polynomial<Fp> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<Fp: FpTrait> Neg for &Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn neg(self) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.set_neg();
        r
    }
}

impl<Fp: FpTrait> Add<Polynomial<Fp>> for Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn add(mut self, other: Polynomial<Fp>) -> Polynomial<Fp> {
        self.set_add(&other);
        self
    }
}

impl<Fp: FpTrait> Add<&Polynomial<Fp>> for &Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn add(self, other: &Polynomial<Fp>) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.set_add(other);
        r
    }
}

impl<Fp: FpTrait> AddAssign<Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn add_assign(&mut self, other: Polynomial<Fp>) {
        self.set_add(&other);
    }
}

impl<Fp: FpTrait> AddAssign<&Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn add_assign(&mut self, other: &Polynomial<Fp>) {
        self.set_add(other);
    }
}

impl<Fp: FpTrait> Sub<Polynomial<Fp>> for Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn sub(mut self, other: Polynomial<Fp>) -> Polynomial<Fp> {
        self.set_sub(&other);
        self
    }
}

impl<Fp: FpTrait> Sub<&Polynomial<Fp>> for &Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn sub(self, other: &Polynomial<Fp>) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.set_sub(other);
        r
    }
}

impl<Fp: FpTrait> SubAssign<Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn sub_assign(&mut self, other: Polynomial<Fp>) {
        self.set_sub(&other);
    }
}

impl<Fp: FpTrait> SubAssign<&Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Polynomial<Fp>) {
        self.set_sub(other);
    }
}

impl<Fp: FpTrait> Mul<&Polynomial<Fp>> for &Polynomial<Fp> {
    type Output = Polynomial<Fp>;

    #[inline(always)]
    fn mul(self, other: &Polynomial<Fp>) -> Polynomial<Fp> {
        let mut r = self.clone();
        r.set_mul(other);
        r
    }
}

impl<Fp: FpTrait> MulAssign<Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn mul_assign(&mut self, other: Polynomial<Fp>) {
        self.set_mul(&other);
    }
}

impl<Fp: FpTrait> MulAssign<&Polynomial<Fp>> for Polynomial<Fp> {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Polynomial<Fp>) {
        self.set_mul(other);
    }
}

impl<Fp: FpTrait> MulAssign<Fp> for Polynomial<Fp> {
    #[inline(always)]
    fn mul_assign(&mut self, other: Fp) {
        self.scale_into(&other);
    }
}

impl<Fp: FpTrait> MulAssign<&Fp> for Polynomial<Fp> {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Fp) {
        self.scale_into(other);
    }
}

impl<Fp: FpTrait> ::std::fmt::Display for Polynomial<Fp> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if i == 0 {
                write!(f, "({})", c)?
            } else {
                write!(f, "({})*x^{} + ", c, i)?
            }
        }
        Ok(())
    }
}

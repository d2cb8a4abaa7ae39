//! Division with remainder, power series inversion and the middle product
//! for `Polynomial`. Quadratic algorithms are kept for short inputs, above
//! the thresholds everything reduces to Karatsuba multiplication.

use fp2::traits::Fp as FpTrait;

use super::poly::Polynomial;

/// Below this many output coefficients series inversion is done term by term.
const INVERSION_THRESHOLD: usize = 16;

/// When either the quotient or the divisor is shorter than this, long
/// division is cheaper than the Newton iteration.
const DIVISION_THRESHOLD: usize = 16;

/// Below this length the middle product is computed directly.
const MIDDLE_PRODUCT_THRESHOLD: usize = 8;

impl<Fp: FpTrait> Polynomial<Fp> {
    /// Return h with h * self = 1 mod x^n. The constant coefficient of self
    /// must be invertible.
    pub fn inverse_series(&self, n: usize) -> Self {
        let a0 = self.coeffs[0];
        assert!(a0.is_zero() == 0, "series inversion needs a unit constant term");

        let a0_inv = Fp::ONE / a0;

        if n <= INVERSION_THRESHOLD {
            return self.inverse_series_basecase(&a0_inv, n);
        }

        // Newton iteration: h <- h * (2 - self * h) doubles the precision at
        // each step.
        let mut h = self.inverse_series_basecase(&a0_inv, INVERSION_THRESHOLD);
        let mut k = INVERSION_THRESHOLD;
        while k < n {
            let k2 = (2 * k).min(n);
            let mut e = &self.truncated(k2) * &h;
            e = e.truncated(k2);
            e.set_neg_in_place();
            e.coeffs[0] += Fp::TWO;
            h = (&h * &e).truncated(k2);
            k = k2;
        }
        h
    }

    /// Term by term inversion: h_i = -a0^(-1) * sum_{j=1..i} a_j h_{i-j}
    fn inverse_series_basecase(&self, a0_inv: &Fp, n: usize) -> Self {
        let n = n.max(1);
        let mut h = vec![Fp::ZERO; n];
        h[0] = *a0_inv;
        for i in 1..n {
            let mut s = Fp::ZERO;
            for j in 1..=i.min(self.len() - 1) {
                s += self.coeffs[j] * h[i - j];
            }
            h[i] = -(s * *a0_inv);
        }
        Self { coeffs: h }
    }

    /// Return (q, r) with self = q * divisor + r and deg r < deg divisor.
    /// The remainder always has deg(divisor) stored coefficients (at least one).
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let dF = divisor
            .degree()
            .expect("division by the zero polynomial");
        let r_len = dF.max(1);

        let dg = match self.degree() {
            Some(dg) if dg >= dF => dg,
            _ => return (Self::zero(), self.truncated(r_len)),
        };
        let m = dg - dF;

        if m < DIVISION_THRESHOLD || dF < DIVISION_THRESHOLD {
            return self.div_rem_basecase(divisor, dg, dF);
        }

        // rev(q) = rev(g) / rev(F) mod y^(m + 1)
        let g_rev = Self::new_from_slice(&self.coeffs[..=dg]).reverse();
        let f_rev = Self::new_from_slice(&divisor.coeffs[..=dF]).reverse();
        let q_rev = (&g_rev.truncated(m + 1) * &f_rev.inverse_series(m + 1)).truncated(m + 1);
        let q = q_rev.reverse();

        // Only the low dF coefficients of g - F * q are non-zero.
        let fq = &divisor.truncated(dF + 1) * &q;
        let mut r = self.truncated(r_len);
        Self::sub_into(&mut r.coeffs, &fq.coeffs[..r_len.min(fq.len())]);
        if dF == 0 {
            r.coeffs[0] = Fp::ZERO;
        }
        (q, r)
    }

    /// Long division, O(deg(q) * deg(F)).
    fn div_rem_basecase(&self, divisor: &Self, dg: usize, dF: usize) -> (Self, Self) {
        let m = dg - dF;
        let lc_inv = Fp::ONE / divisor.coeffs[dF];

        let mut r = self.coeffs[..=dg].to_vec();
        let mut q = vec![Fp::ZERO; m + 1];
        for i in (0..=m).rev() {
            let c = r[i + dF] * lc_inv;
            q[i] = c;
            for j in 0..=dF {
                r[i + j] -= c * divisor.coeffs[j];
            }
        }

        let r_len = dF.max(1);
        r.truncate(r_len);
        if dF == 0 {
            r[0] = Fp::ZERO;
        }
        (Self { coeffs: q }, Self { coeffs: r })
    }

    /// Return self mod modulus.
    pub fn remainder(&self, modulus: &Self) -> Self {
        self.div_rem(modulus).1
    }

    fn set_neg_in_place(&mut self) {
        for c in self.coeffs.iter_mut() {
            c.set_neg();
        }
    }

    /// Middle product of f and g: the coefficients of f * g from x^(len(f) - 1)
    /// up to x^(len(g) - 1). The result has len(g) - len(f) + 1 coefficients
    /// and requires len(g) >= len(f).
    pub fn middle_product(f: &[Fp], g: &[Fp]) -> Self {
        assert!(g.len() >= f.len() && !f.is_empty());
        let mut out = vec![Fp::ZERO; g.len() - f.len() + 1];
        Self::middle_product_into(&mut out, f, g);
        Self { coeffs: out }
    }

    /// out[i] = sum_j a[j] * b[i + len(a) - 1 - j] for 0 <= i < len(out), with
    /// len(b) = len(a) + len(out) - 1.
    pub(crate) fn middle_product_into(out: &mut [Fp], a: &[Fp], b: &[Fp]) {
        let n = a.len();
        let L = out.len();
        debug_assert!(b.len() + 1 == n + L);

        if n == 0 || L == 0 {
            for c in out.iter_mut() {
                *c = Fp::ZERO;
            }
            return;
        }

        if n <= MIDDLE_PRODUCT_THRESHOLD || L <= MIDDLE_PRODUCT_THRESHOLD {
            Self::middle_product_basecase(out, a, b);
            return;
        }

        // More outputs than inputs: each block of n outputs is a balanced
        // middle product against a window of b.
        if L > n {
            let mut start = 0;
            while start < L {
                let len = n.min(L - start);
                Self::middle_product_into(
                    &mut out[start..start + len],
                    a,
                    &b[start..start + n + len - 1],
                );
                start += len;
            }
            return;
        }

        // Fewer outputs than inputs: split a into chunks of length L and sum
        // the balanced middle products.
        if L < n {
            for c in out.iter_mut() {
                *c = Fp::ZERO;
            }
            let mut tmp = vec![Fp::ZERO; L];
            let mut lo = 0;
            while lo < n {
                let n_c = L.min(n - lo);
                let s = n - lo - n_c;
                Self::middle_product_into(&mut tmp, &a[lo..lo + n_c], &b[s..s + n_c + L - 1]);
                Self::add_into(out, &tmp);
                lo += n_c;
            }
            return;
        }

        Self::middle_product_karatsuba(out, a, b);
    }

    /// Quadratic middle product.
    fn middle_product_basecase(out: &mut [Fp], a: &[Fp], b: &[Fp]) {
        let n = a.len();
        for (i, c) in out.iter_mut().enumerate() {
            let mut s = Fp::ZERO;
            for j in 0..n {
                s += a[j] * b[i + n - 1 - j];
            }
            *c = s;
        }
    }

    /// Balanced middle product (len(out) == len(a)) with three half size
    /// middle products, the transpose of Karatsuba multiplication.
    fn middle_product_karatsuba(out: &mut [Fp], a: &[Fp], b: &[Fp]) {
        let n = a.len();

        // Odd lengths are padded to the next even length: a gets a zero on
        // top and b a zero on both ends; the extra output is dropped.
        if n % 2 == 1 {
            let mut a_pad = a.to_vec();
            a_pad.push(Fp::ZERO);
            let mut b_pad = Vec::with_capacity(b.len() + 2);
            b_pad.push(Fp::ZERO);
            b_pad.extend_from_slice(b);
            b_pad.push(Fp::ZERO);
            let mut out_pad = vec![Fp::ZERO; n + 1];
            Self::middle_product_into(&mut out_pad, &a_pad, &b_pad);
            out.copy_from_slice(&out_pad[..n]);
            return;
        }

        // With a = a0 + x^k a1 and B_s = b[s..s + 2k - 1]:
        //   alpha = MP(a0 + a1, B_k)
        //   beta  = MP(a1, B_0 - B_k)
        //   gamma = MP(a0, B_2k - B_k)
        // then out_lo = alpha + beta and out_hi = alpha + gamma.
        let k = n / 2;
        let w = 2 * k - 1;
        let (a0, a1) = a.split_at(k);
        let b_k = &b[k..k + w];

        let mut a_sum = a0.to_vec();
        Self::add_into(&mut a_sum, a1);
        let mut alpha = vec![Fp::ZERO; k];
        Self::middle_product_into(&mut alpha, &a_sum, b_k);

        let mut b_lo = b[..w].to_vec();
        Self::sub_into(&mut b_lo, b_k);
        let (out_lo, out_hi) = out.split_at_mut(k);
        Self::middle_product_into(out_lo, a1, &b_lo);
        Self::add_into(out_lo, &alpha);

        let mut b_hi = b[2 * k..2 * k + w].to_vec();
        Self::sub_into(&mut b_hi, b_k);
        Self::middle_product_into(out_hi, a0, &b_hi);
        Self::add_into(out_hi, &alpha);
    }

    /// Resultant Res(self, other) by the Euclidean algorithm, using
    /// Res(a, b) = (-1)^(deg a * deg b) * lc(b)^(deg a - deg r) * Res(b, r)
    /// with r = a mod b, and Res(a, c) = c^(deg a) for a constant c.
    pub fn resultant(&self, other: &Self) -> Fp {
        let mut a = self.clone();
        let mut b = other.clone();
        let mut acc = Fp::ONE;

        loop {
            let (Some(m), Some(n)) = (a.degree(), b.degree()) else {
                return Fp::ZERO;
            };
            if n == 0 {
                let mut c = b.coeffs[0];
                c.set_pow_u64_vartime(m as u64);
                return acc * c;
            }
            if m == 0 {
                let mut c = a.coeffs[0];
                c.set_pow_u64_vartime(n as u64);
                return acc * c;
            }

            let r = a.remainder(&b);
            let Some(k) = r.degree() else {
                return Fp::ZERO;
            };

            if (m * n) % 2 == 1 {
                acc.set_neg();
            }
            let mut lc = b.coeffs[n];
            lc.set_pow_u64_vartime((m - k) as u64);
            acc *= lc;

            a = b;
            b = r;
        }
    }
}

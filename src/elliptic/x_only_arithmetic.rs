use fp2::traits::Fp as FqTrait;

use crate::utilities::bn::{
    bn_bit_length_vartime, factorisation_to_bn_vartime, prime_power_to_bn_vartime,
};

use super::{curve::Curve, point::PointX};

impl<Fq: FqTrait> Curve<Fq> {
    // ============================================================
    // Formulae on projective constants (A24 : C24) = (A + 2C : 4C)
    // so that isogeny chains never need an inversion between steps.

    /// Compute [2]P in place using projective (A + 2) / 4 = (A24 : C24)
    /// Cost: 2S + 4M
    #[inline(always)]
    pub(crate) fn xdbl_proj(A24: &Fq, C24: &Fq, X: &mut Fq, Z: &mut Fq) {
        let mut t0 = *X + *Z;
        t0.set_square();
        let mut t1 = *X - *Z;
        t1.set_square();
        let t2 = t0 - t1;
        t1 *= *C24;
        *X = t0 * t1;
        t0 = t2 * (*A24);
        t0 += t1;
        *Z = t0 * t2;
    }

    /// Compute [2^n]P in place using projective (A24 : C24)
    pub(crate) fn xdbl_proj_iter(A24: &Fq, C24: &Fq, P: &mut PointX<Fq>, n: usize) {
        for _ in 0..n {
            Self::xdbl_proj(A24, C24, &mut P.X, &mut P.Z);
        }
    }

    /// x-only differential formula Note: order of arguments:
    /// (XPQ : ZPQ), (XP : ZP), (XQ : ZQ) For PQ = P - Q
    /// Sets Q  = P + Q in place
    #[inline(always)]
    pub(crate) fn xadd(XPQ: &Fq, ZPQ: &Fq, XP: &Fq, ZP: &Fq, XQ: &mut Fq, ZQ: &mut Fq) {
        let V1 = (*XP - *ZP) * (*XQ + *ZQ);
        let V2 = (*XP + *ZP) * (*XQ - *ZQ);
        *XQ = *ZPQ * (V1 + V2).square();
        *ZQ = *XPQ * (V1 - V2).square();
    }

    /// x-only differential formula with affine difference (XPQ : 1)
    /// Sets Q  = P + Q in place
    #[inline(always)]
    fn xadd_aff(XPQ: &Fq, XP: &Fq, ZP: &Fq, XQ: &mut Fq, ZQ: &mut Fq) {
        let V1 = (*XP - *ZP) * (*XQ + *ZQ);
        let V2 = (*XP + *ZP) * (*XQ - *ZQ);
        *XQ = (V1 + V2).square();
        *ZQ = *XPQ * (V1 - V2).square();
    }

    /// Return P + Q given P, Q and the difference P - Q.
    #[inline(always)]
    pub(crate) fn xdiff_add(P: &PointX<Fq>, Q: &PointX<Fq>, PQ: &PointX<Fq>) -> PointX<Fq> {
        let mut R = *Q;
        Self::xadd(&PQ.X, &PQ.Z, &P.X, &P.Z, &mut R.X, &mut R.Z);
        R
    }

    /// Montgomery ladder over the bits of a little endian multi-word scalar,
    /// the top `nbitlen` bits of which are used.
    fn xmul_proj_ladder(
        A24: &Fq,
        C24: &Fq,
        P3: &mut PointX<Fq>,
        P: &PointX<Fq>,
        n: &[u64],
        nbitlen: usize,
    ) {
        let mut X0 = Fq::ONE;
        let mut Z0 = Fq::ZERO;
        let mut X1 = P.X;
        let mut Z1 = P.Z;
        let mut cc = 0u32;
        if nbitlen > 21 {
            // If n is large enough then it is worthwhile to
            // normalize the source point to affine.
            // If P = inf, then this sets Xp to 0; thus, the
            // output of both xdbl() and xadd_aff() has Z = 0,
            // so we correctly get the point-at-infinity at the end.
            let Xp = P.X / P.Z;
            for i in (0..nbitlen).rev() {
                let ctl = (((n[i >> 6] >> (i & 63)) as u32) & 1).wrapping_neg();
                Fq::condswap(&mut X0, &mut X1, ctl ^ cc);
                Fq::condswap(&mut Z0, &mut Z1, ctl ^ cc);
                Self::xadd_aff(&Xp, &X0, &Z0, &mut X1, &mut Z1);
                Self::xdbl_proj(A24, C24, &mut X0, &mut Z0);
                cc = ctl;
            }
        } else {
            for i in (0..nbitlen).rev() {
                let ctl = (((n[i >> 6] >> (i & 63)) as u32) & 1).wrapping_neg();
                Fq::condswap(&mut X0, &mut X1, ctl ^ cc);
                Fq::condswap(&mut Z0, &mut Z1, ctl ^ cc);
                Self::xadd(&P.X, &P.Z, &X0, &Z0, &mut X1, &mut Z1);
                Self::xdbl_proj(A24, C24, &mut X0, &mut Z0);
                cc = ctl;
            }
        }
        Fq::condswap(&mut X0, &mut X1, cc);
        Fq::condswap(&mut Z0, &mut Z1, cc);

        // The ladder may fail if P = (0,0) (which is a point of
        // order 2) because in that case xadd() (and xadd_aff())
        // return Z = 0 systematically, so the result is considered
        // to be the point-at-infinity, which is wrong is n is odd.
        // We adjust the result in that case.
        let spec = P.X.is_zero() & !P.Z.is_zero() & ((n[0] & 1) as u32).wrapping_neg();
        P3.X = X0;
        P3.Z = Z0;
        P3.X.set_cond(&Fq::ZERO, spec);
        P3.Z.set_cond(&Fq::ONE, spec);
    }

    /// P3 <- n*P, x-only variant using (A24 : C24).
    /// Integer n is represented as a u64 and is assumed to be public.
    pub fn set_xmul_proj_u64_vartime(
        A24: &Fq,
        C24: &Fq,
        P3: &mut PointX<Fq>,
        P: &PointX<Fq>,
        n: u64,
    ) {
        match n {
            0 => *P3 = PointX::INFINITY,
            1 => *P3 = *P,
            2 => {
                *P3 = *P;
                Self::xdbl_proj(A24, C24, &mut P3.X, &mut P3.Z);
            }
            _ => {
                let nbitlen = (u64::BITS - n.leading_zeros()) as usize;
                Self::xmul_proj_ladder(A24, C24, P3, P, &[n], nbitlen);
            }
        }
    }

    /// P3 <- n*P, x-only variant using (A24 : C24). Integer n is represented
    /// as a big integer with u64 words, little endian and is assumed to be public.
    pub fn set_xmul_proj_bn_vartime(
        A24: &Fq,
        C24: &Fq,
        P3: &mut PointX<Fq>,
        P: &PointX<Fq>,
        n: &[u64],
    ) {
        let nbitlen = bn_bit_length_vartime(n);
        if nbitlen <= 64 {
            Self::set_xmul_proj_u64_vartime(A24, C24, P3, P, n.first().copied().unwrap_or(0));
            return;
        }
        Self::xmul_proj_ladder(A24, C24, P3, P, n, nbitlen);
    }

    /// Return n*P as a new point (x-only variant) using (A24 : C24).
    pub fn xmul_proj_u64_vartime(A24: &Fq, C24: &Fq, P: &PointX<Fq>, n: u64) -> PointX<Fq> {
        let mut P3 = PointX::INFINITY;
        Self::set_xmul_proj_u64_vartime(A24, C24, &mut P3, P, n);
        P3
    }

    /// Return n*P as a new point (x-only variant) using (A24 : C24).
    pub fn xmul_proj_bn_vartime(A24: &Fq, C24: &Fq, P: &PointX<Fq>, n: &[u64]) -> PointX<Fq> {
        let mut P3 = PointX::INFINITY;
        Self::set_xmul_proj_bn_vartime(A24, C24, &mut P3, P, n);
        P3
    }

    /// Return [x^e]*P as a new point (x-only variant) using (A24 : C24).
    pub fn xmul_proj_prime_power_vartime(
        A24: &Fq,
        C24: &Fq,
        P: &PointX<Fq>,
        x: usize,
        e: usize,
    ) -> PointX<Fq> {
        // When x = 2 we can do repeated doubling
        if x == 2 {
            let mut Q = *P;
            Self::xdbl_proj_iter(A24, C24, &mut Q, e);
            return Q;
        }
        let n = prime_power_to_bn_vartime(x, e);
        Self::xmul_proj_bn_vartime(A24, C24, P, &n)
    }

    // ============================================================
    // The same operations on the affine curve.

    /// Return [2]P.
    pub fn xdbl(&self, P: &PointX<Fq>) -> PointX<Fq> {
        let (A24, C24) = self.A24_proj();
        let mut Q = *P;
        Self::xdbl_proj(&A24, &C24, &mut Q.X, &mut Q.Z);
        Q
    }

    /// Return [n]P for a public u64 scalar.
    pub fn xmul_u64_vartime(&self, P: &PointX<Fq>, n: u64) -> PointX<Fq> {
        let (A24, C24) = self.A24_proj();
        Self::xmul_proj_u64_vartime(&A24, &C24, P, n)
    }

    /// Return [n]P for a public scalar given as little endian u64 words.
    pub fn xmul_bn_vartime(&self, P: &PointX<Fq>, n: &[u64]) -> PointX<Fq> {
        let (A24, C24) = self.A24_proj();
        Self::xmul_proj_bn_vartime(&A24, &C24, P, n)
    }

    /// Return [ell^e]P.
    pub fn xmul_prime_power_vartime(&self, P: &PointX<Fq>, ell: usize, e: usize) -> PointX<Fq> {
        let (A24, C24) = self.A24_proj();
        Self::xmul_proj_prime_power_vartime(&A24, &C24, P, ell, e)
    }

    /// Return [prod ell_i^e_i]P for the factorisation [(ell_0, e_0), ...].
    pub fn xmul_factorisation_vartime(
        &self,
        P: &PointX<Fq>,
        factorisation: &[(usize, usize)],
    ) -> PointX<Fq> {
        if factorisation.is_empty() {
            return *P;
        }
        let n = factorisation_to_bn_vartime(factorisation);
        self.xmul_bn_vartime(P, &n)
    }
}

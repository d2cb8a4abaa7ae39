//! Chains of prime degree isogenies.
//!
//! An isogeny of degree ell^k is computed as k steps of degree ell. The
//! kernel of step i is generated by the image of [ell^(k - i)]K, and finding
//! these points is where the cost lies: `sparse_prime_power_chain` splits
//! the chain recursively so that only O(log k) points are tracked at once.
//! `CompositeIsogeny` strings the prime power chains of a smooth degree
//! together, clearing the cofactor of each prime before its chain.

use fp2::traits::Fp as FqTrait;
use tracing::{debug, instrument, trace};

use crate::{
    error::IsogenyError,
    utilities::factor::{
        check_factorisation, factor_u128_vartime, factorisation_to_u128, is_prime_vartime,
    },
};

use super::{
    curve::Curve,
    point::PointX,
    velu::{VeluAlgorithm, VeluIsogeny},
};

/// Tuning of the sparse strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrategyParams {
    /// Fraction of the chain whose kernel point is computed by scalar
    /// multiplication before recursing, must lie in (0, 1).
    pub split: f64,
    /// Prime steps of degree above this bound use square root Velu.
    pub velu_bound: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            split: 0.8,
            velu_bound: 400,
        }
    }
}

impl StrategyParams {
    pub fn new(split: f64, velu_bound: usize) -> Result<Self, IsogenyError> {
        let params = Self { split, velu_bound };
        params.validate()?;
        Ok(params)
    }

    pub fn with_split(self, split: f64) -> Self {
        Self { split, ..self }
    }

    pub fn with_velu_bound(self, velu_bound: usize) -> Self {
        Self { velu_bound, ..self }
    }

    pub fn validate(&self) -> Result<(), IsogenyError> {
        if self.split > 0.0 && self.split < 1.0 {
            Ok(())
        } else {
            Err(IsogenyError::InvalidSplit(self.split))
        }
    }

    /// The formulae used for a prime step of degree ell.
    pub fn algorithm_for(&self, ell: usize) -> VeluAlgorithm {
        if ell > self.velu_bound {
            VeluAlgorithm::SquareRoot
        } else {
            VeluAlgorithm::Direct
        }
    }
}

/// A group in which isogeny chains can be computed.
pub trait IsogenyDomain: Clone {
    type Point: Copy;
    type Isogeny: PrimeIsogeny<Point = Self::Point, Domain = Self>;

    /// Whether P is an element of this group.
    fn contains(&self, P: &Self::Point) -> bool;

    fn is_identity(&self, P: &Self::Point) -> bool;

    /// Return [ell^e]P.
    fn mul_prime_power(&self, P: &Self::Point, ell: usize, e: usize) -> Self::Point;

    /// Return [prod ell_i^e_i]P.
    fn mul_factorisation(&self, P: &Self::Point, factors: &[(usize, usize)]) -> Self::Point;

    /// The isogeny of prime degree ell with kernel generated by K, which has
    /// exact order ell.
    fn prime_isogeny(
        &self,
        K: &Self::Point,
        ell: usize,
        algorithm: VeluAlgorithm,
    ) -> Result<Self::Isogeny, IsogenyError>;
}

/// An isogeny of prime degree which can evaluate points after construction.
pub trait PrimeIsogeny: Clone {
    type Point: Copy;
    type Domain: Clone;

    fn degree(&self) -> usize;

    fn codomain(&self) -> &Self::Domain;

    fn eval(&self, P: &Self::Point) -> Self::Point;

    fn eval_into(&self, points: &mut [Self::Point]) {
        for P in points.iter_mut() {
            *P = self.eval(P);
        }
    }
}

/// Push P through the steps of a chain in order.
pub fn eval_chain<I: PrimeIsogeny>(steps: &[I], P: &I::Point) -> I::Point {
    steps.iter().fold(*P, |Q, step| step.eval(&Q))
}

/// Number of steps k1 handled by the near half of a chain of length k > 1:
/// round(k * split), kept within [1, k - 1].
pub fn split_point(k: usize, split: f64) -> usize {
    debug_assert!(k > 1);
    let k1 = (k as f64 * split + 0.5) as usize;
    k1.clamp(1, k - 1)
}

/// Compute the ell^k isogeny with kernel <Q>, for Q of exact order ell^k,
/// as k steps of degree ell. The first k - k1 steps are found from
/// Q1 = [ell^k1]Q, Q is then pushed through them and the remaining k1 steps
/// are found from its image, both halves recursively.
#[instrument(level = "debug", skip_all, fields(ell = ell, k = k))]
pub fn sparse_prime_power_chain<D: IsogenyDomain>(
    domain: &D,
    Q: &D::Point,
    ell: usize,
    k: usize,
    params: &StrategyParams,
) -> Result<Vec<D::Isogeny>, IsogenyError> {
    if k == 0 || !is_prime_vartime(ell) {
        return Err(IsogenyError::InvalidFactor { ell, e: k });
    }
    params.validate()?;
    sparse_chain_recursive(domain, Q, ell, k, params)
}

fn sparse_chain_recursive<D: IsogenyDomain>(
    domain: &D,
    Q: &D::Point,
    ell: usize,
    k: usize,
    params: &StrategyParams,
) -> Result<Vec<D::Isogeny>, IsogenyError> {
    if k == 1 {
        let step = domain.prime_isogeny(Q, ell, params.algorithm_for(ell))?;
        return Ok(vec![step]);
    }

    let k1 = split_point(k, params.split);
    trace!(k, k1, "split");

    let Q1 = domain.mul_prime_power(Q, ell, k1);
    let mut chain = sparse_chain_recursive(domain, &Q1, ell, k - k1, params)?;

    let Q2 = eval_chain(&chain, Q);
    let next = chain
        .last()
        .map_or_else(|| domain.clone(), |step| step.codomain().clone());
    let near = sparse_chain_recursive(&next, &Q2, ell, k1, params)?;

    chain.extend(near);
    Ok(chain)
}

/// Render [(2, 3), (5, 1)] as "2^3 * 5".
fn format_factorisation(factors: &[(usize, usize)]) -> String {
    factors
        .iter()
        .map(|(ell, e)| {
            if *e == 1 {
                ell.to_string()
            } else {
                format!("{ell}^{e}")
            }
        })
        .collect::<Vec<_>>()
        .join(" * ")
}

/// Check that P has exact order prod ell_i^e_i.
fn check_order<D: IsogenyDomain>(
    domain: &D,
    P: &D::Point,
    factors: &[(usize, usize)],
) -> Result<(), IsogenyError> {
    let wrong_order = || IsogenyError::WrongOrder {
        order: format_factorisation(factors),
    };

    if !domain.is_identity(&domain.mul_factorisation(P, factors)) {
        return Err(wrong_order());
    }
    for i in 0..factors.len() {
        let mut cofactor = factors.to_vec();
        cofactor[i].1 -= 1;
        if domain.is_identity(&domain.mul_factorisation(P, &cofactor)) {
            return Err(wrong_order());
        }
    }
    Ok(())
}

/// An isogeny of smooth degree prod ell_i^e_i, stored as its chain of
/// prime degree steps.
#[derive(Clone, Debug)]
pub struct CompositeIsogeny<D: IsogenyDomain> {
    domain: D,
    codomain: D,
    steps: Vec<D::Isogeny>,
    factors: Vec<(usize, usize)>,
}

impl<D: IsogenyDomain> CompositeIsogeny<D> {
    /// The isogeny with kernel <K> for K of exact order `degree`. The degree
    /// is factored by trial division. Every point of `images` is replaced
    /// by its image.
    pub fn new(
        domain: &D,
        K: &D::Point,
        degree: u128,
        params: &StrategyParams,
        images: &mut [D::Point],
    ) -> Result<Self, IsogenyError> {
        if degree == 0 {
            return Err(IsogenyError::InvalidFactor { ell: 0, e: 1 });
        }
        if degree == 1 {
            return Ok(Self::identity(domain));
        }
        let factors = factor_u128_vartime(degree)?;
        Self::from_factorisation(domain, K, &factors, params, images)
    }

    /// The isogeny with kernel <K> for K of exact order prod ell_i^e_i,
    /// given as [(ell_0, e_0), (ell_1, e_1), ...]. The prime power chains
    /// are computed in the order of the factorisation. Every point of
    /// `images` is replaced by its image.
    #[instrument(level = "debug", skip_all, fields(factors = factors.len()))]
    pub fn from_factorisation(
        domain: &D,
        K: &D::Point,
        factors: &[(usize, usize)],
        params: &StrategyParams,
        images: &mut [D::Point],
    ) -> Result<Self, IsogenyError> {
        check_factorisation(factors)?;
        params.validate()?;
        if factors.is_empty() {
            return Ok(Self::identity(domain));
        }

        if !domain.contains(K) {
            return Err(IsogenyError::NotOnCurve);
        }
        check_order(domain, K, factors)?;

        let mut kernel = *K;
        let mut current = domain.clone();
        let mut steps = Vec::new();

        for (i, (ell, e)) in factors.iter().enumerate() {
            debug!(ell, e, "prime power chain");

            // Q = [prod_{j > i} ell_j^e_j] K has order ell^e
            let Q = current.mul_factorisation(&kernel, &factors[i + 1..]);
            let chain = sparse_chain_recursive(&current, &Q, *ell, *e, params)?;

            for step in chain.iter() {
                step.eval_into(images);
                kernel = step.eval(&kernel);
            }
            if let Some(last) = chain.last() {
                current = last.codomain().clone();
            }
            steps.extend(chain);
        }

        assert!(
            current.is_identity(&kernel),
            "kernel generator does not vanish at the end of the chain"
        );

        Ok(Self {
            domain: domain.clone(),
            codomain: current,
            steps,
            factors: factors.to_vec(),
        })
    }

    /// The identity map on `domain`.
    pub fn identity(domain: &D) -> Self {
        Self {
            domain: domain.clone(),
            codomain: domain.clone(),
            steps: Vec::new(),
            factors: Vec::new(),
        }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn codomain(&self) -> &D {
        &self.codomain
    }

    /// The prime degree steps, in the order they are applied.
    pub fn steps(&self) -> &[D::Isogeny] {
        &self.steps
    }

    /// The factorisation of the degree, in processing order.
    pub fn degree_factors(&self) -> &[(usize, usize)] {
        &self.factors
    }

    /// The degree prod ell_i^e_i, or `DegreeOverflow` when it does not fit
    /// in a u128.
    pub fn degree(&self) -> Result<u128, IsogenyError> {
        factorisation_to_u128(&self.factors)
    }

    pub fn eval(&self, P: &D::Point) -> D::Point {
        eval_chain(&self.steps, P)
    }

    pub fn eval_into(&self, points: &mut [D::Point]) {
        for step in self.steps.iter() {
            step.eval_into(points);
        }
    }
}

impl<Fq: FqTrait> IsogenyDomain for Curve<Fq> {
    type Point = PointX<Fq>;
    type Isogeny = VeluIsogeny<Fq>;

    fn contains(&self, P: &PointX<Fq>) -> bool {
        self.is_on_curve(P) == u32::MAX
    }

    fn is_identity(&self, P: &PointX<Fq>) -> bool {
        P.is_zero() == u32::MAX
    }

    fn mul_prime_power(&self, P: &PointX<Fq>, ell: usize, e: usize) -> PointX<Fq> {
        self.xmul_prime_power_vartime(P, ell, e)
    }

    fn mul_factorisation(&self, P: &PointX<Fq>, factors: &[(usize, usize)]) -> PointX<Fq> {
        self.xmul_factorisation_vartime(P, factors)
    }

    fn prime_isogeny(
        &self,
        K: &PointX<Fq>,
        ell: usize,
        algorithm: VeluAlgorithm,
    ) -> Result<VeluIsogeny<Fq>, IsogenyError> {
        VeluIsogeny::new(self, K, ell, algorithm)
    }
}

impl<Fq: FqTrait> PrimeIsogeny for VeluIsogeny<Fq> {
    type Point = PointX<Fq>;
    type Domain = Curve<Fq>;

    fn degree(&self) -> usize {
        VeluIsogeny::degree(self)
    }

    fn codomain(&self) -> &Curve<Fq> {
        VeluIsogeny::codomain(self)
    }

    fn eval(&self, P: &PointX<Fq>) -> PointX<Fq> {
        VeluIsogeny::eval(self, P)
    }

    fn eval_into(&self, points: &mut [PointX<Fq>]) {
        VeluIsogeny::eval_into(self, points)
    }
}

impl<Fq: FqTrait> Curve<Fq> {
    /// Compute the isogeny of smooth degree prod ell_i^e_i with kernel <K>,
    /// replace `images` by their images and return the codomain.
    pub fn composite_isogeny(
        &self,
        K: &PointX<Fq>,
        factors: &[(usize, usize)],
        params: &StrategyParams,
        images: &mut [PointX<Fq>],
    ) -> Result<Curve<Fq>, IsogenyError> {
        let phi = CompositeIsogeny::from_factorisation(self, K, factors, params, images)?;
        Ok(*phi.codomain())
    }
}

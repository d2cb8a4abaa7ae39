//! Product trees and remainder trees for batched reduction of a polynomial
//! modulo many small moduli.
//!
//! A `ProductTree` stores every internal product of a list of factors so that
//! a polynomial can be reduced modulo all factors at once by walking down the
//! tree, rather than reducing modulo each factor independently. The scaled
//! variant replaces every reduction below the root with a middle product.

use std::marker::PhantomData;

use fp2::traits::Fp as FqTrait;

use super::poly::{Poly, Polynomial};

/// Binary tree of polynomial products. Leaves hold the input factors in
/// order, every internal node holds the product of its two children.
#[derive(Clone, Debug)]
pub struct ProductTree<Fq: FqTrait, P: Poly<Fq> = Polynomial<Fq>> {
    left: Option<Box<ProductTree<Fq, P>>>,
    right: Option<Box<ProductTree<Fq, P>>>,
    poly: P,
    degree: usize,
    leaves: usize,
    _field: PhantomData<Fq>,
}

impl<Fq: FqTrait, P: Poly<Fq>> ProductTree<Fq, P> {
    /// Build the product tree of `factors`. The left subtree always receives
    /// the larger half, n - floor(n / 2) factors. An empty input gives a
    /// single node holding the constant 1.
    pub fn new(factors: &[P]) -> Self {
        let n = factors.len();
        if n == 0 {
            return Self::leaf(P::one(), 0);
        }
        if n == 1 {
            return Self::leaf(factors[0].clone(), 1);
        }

        let m = n - n / 2;
        let left = Self::new(&factors[..m]);
        let right = Self::new(&factors[m..]);
        let poly = left.poly.multiply(&right.poly);
        let degree = left.degree + right.degree;

        Self {
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            poly,
            degree,
            leaves: n,
            _field: PhantomData,
        }
    }

    /// Product tree of the monic linear factors x - r_i.
    pub fn from_roots(roots: &[Fq]) -> Self {
        let factors: Vec<P> = roots
            .iter()
            .map(|r| P::new_from_slice(&[-*r, Fq::ONE]))
            .collect();
        Self::new(&factors)
    }

    fn leaf(poly: P, leaves: usize) -> Self {
        let degree = poly.degree().unwrap_or(0);
        Self {
            left: None,
            right: None,
            poly,
            degree,
            leaves,
            _field: PhantomData,
        }
    }

    /// The product of all factors below this node.
    pub fn poly(&self) -> &P {
        &self.poly
    }

    /// Degree of `poly()`, the sum of the degrees of the leaves.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of factors below this node.
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn left(&self) -> Option<&ProductTree<Fq, P>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&ProductTree<Fq, P>> {
        self.right.as_deref()
    }

    /// Return g mod f_i for every leaf f_i, in leaf order.
    pub fn remainders(&self, g: &P) -> Vec<P> {
        multieval_unscaled(g, self, self.leaves)
    }

    /// Scaled remainder tree: for monic linear leaves x - r_i return g(r_i)
    /// in leaf order, as constant polynomials. Below the root every
    /// reduction is a middle product, so this is cheaper than
    /// `remainders`. For a linear leaf a*x - b the value is g(b/a) / a.
    pub fn scaled_remainders(&self, g: &P) -> Vec<P> {
        let n = self.leaves;
        if n == 0 {
            return vec![P::one()];
        }
        assert!(
            self.degree == n,
            "scaled remainder trees need linear leaves"
        );

        let D = self.degree;
        let u = scaled_root_data(g, &self.poly, D);
        multieval_scaled(&u, D, &[Fq::ONE], D, self, n)
    }

    /// Res(poly, prod f_i) for monic linear leaves f_i, from the product of
    /// the remainders of poly modulo the leaves.
    pub fn resultant(&self, poly: &P) -> Fq {
        let remainders = self.remainders(poly);

        let mut r = P::one();
        for rem in remainders.iter() {
            r = r.multiply(rem);
        }
        assert!(
            r.is_constant(),
            "product of remainders is not constant, the leaves must be linear"
        );

        let odd_degree = poly.degree().is_some_and(|d| d % 2 == 1);
        let mut res = r.constant_coefficient().unwrap_or(Fq::ZERO);
        if self.leaves % 2 == 1 && odd_degree {
            res.set_neg();
        }
        res
    }
}

/// Compute g mod f_1, ..., g mod f_n for the n leaves of `tree`, reducing g
/// modulo each node before descending.
pub fn multieval_unscaled<Fq: FqTrait, P: Poly<Fq>>(
    g: &P,
    tree: &ProductTree<Fq, P>,
    n: usize,
) -> Vec<P> {
    if n == 0 {
        return vec![P::one()];
    }

    let g_mod = g.remainder(&tree.poly);
    if n == 1 {
        return vec![g_mod];
    }

    let (Some(left), Some(right)) = (tree.left(), tree.right()) else {
        unreachable!("internal product tree node without children");
    };
    let m = n - n / 2;
    let mut out = multieval_unscaled(&g_mod, left, m);
    out.extend(multieval_unscaled(&g_mod, right, n - m));
    out
}

/// The data the scaled tree starts from: with F of degree D, the first D
/// coefficients s_1, ..., s_D of g / F in x^-1, stored as u[i] = s_{D - i}.
/// With h = rev(g) / rev(F) mod y^(deg g + 1) this is u[i] = h[deg g - i].
fn scaled_root_data<Fq: FqTrait, P: Poly<Fq>>(g: &P, F: &P, D: usize) -> Vec<Fq> {
    let mut u = vec![Fq::ZERO; D];
    let (Some(dg), Some(dF)) = (g.degree(), F.degree()) else {
        return u;
    };

    let g_rev = P::new_from_slice(&g.coeffs()[..=dg]).reverse();
    let F_rev = P::new_from_slice(&F.coeffs()[..=dF]).reverse();
    let h = g_rev.multiply(&F_rev.inverse_series(dg + 1));

    for (i, ui) in u.iter_mut().enumerate().take(dg + 1) {
        *ui = h.coeffs()[dg - i];
    }
    u
}

/// Scaled remainder tree. `g` holds the scaled data of the parent node (its
/// first `g_len` coefficients are used) and `f` the sibling product of the
/// current node, with `f_len = deg(f) + 1`. The data of the current node is
/// the middle product of f and g, apart from the root call where
/// `f_len == g_len == n` and the data is passed through unchanged.
pub fn multieval_scaled<Fq: FqTrait, P: Poly<Fq>>(
    g: &[Fq],
    g_len: usize,
    f: &[Fq],
    f_len: usize,
    tree: &ProductTree<Fq, P>,
    n: usize,
) -> Vec<P> {
    if n == 0 {
        return vec![P::one()];
    }

    let fg: Vec<Fq> = if f_len == n && g_len == n && n > 1 {
        g[..g_len].to_vec()
    } else if g_len < f_len {
        // Constant leaves leave nothing to reduce.
        Vec::new()
    } else {
        P::middle_product(&f[..f_len], &g[..g_len]).coeffs().to_vec()
    };

    if n == 1 {
        // For a linear modulus the reduction is the last coefficient.
        return match fg.last() {
            Some(c) => vec![P::new_from_ele(c)],
            None => vec![P::one()],
        };
    }

    let (Some(left), Some(right)) = (tree.left(), tree.right()) else {
        unreachable!("internal product tree node without children");
    };
    let m = n - n / 2;
    let mut out = multieval_scaled(
        &fg,
        tree.degree,
        &right.poly.coeffs()[..=right.degree],
        right.degree + 1,
        left,
        m,
    );
    out.extend(multieval_scaled(
        &fg,
        tree.degree,
        &left.poly.coeffs()[..=left.degree],
        left.degree + 1,
        right,
        n - m,
    ));
    out
}

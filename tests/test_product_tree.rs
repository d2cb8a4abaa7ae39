#![allow(non_snake_case)]

#[cfg(test)]
mod test_product_tree {
    use fp2::traits::Fp as _;
    use isogeny::{
        fields::smooth::SmoothFp2 as Fp2,
        polynomial_ring::{
            poly::Polynomial,
            product_tree::{ProductTree, multieval_unscaled},
        },
        utilities::test_utils::drng::DRNG,
    };

    type PR = Polynomial<Fp2>;

    const LEAF_COUNTS: [usize; 8] = [1, 2, 3, 5, 7, 16, 33, 64];

    fn random_roots(rng: &mut DRNG, n: usize) -> Vec<Fp2> {
        (0..n).map(|_| Fp2::rand(rng)).collect()
    }

    #[test]
    fn test_tree_shape() {
        let mut rng = DRNG::from_seed("product_tree_shape".as_bytes());

        for n in LEAF_COUNTS {
            let roots = random_roots(&mut rng, n);
            let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);
            assert_eq!(tree.leaves(), n);
            assert_eq!(tree.degree(), n);
            assert!(tree.poly().equals(&PR::from_roots(&roots)) == u32::MAX);

            // Every internal node is the product of its children and the
            // left child holds the larger half.
            let mut stack = vec![&tree];
            while let Some(node) = stack.pop() {
                match (node.left(), node.right()) {
                    (Some(left), Some(right)) => {
                        assert_eq!(left.leaves(), node.leaves() - node.leaves() / 2);
                        assert_eq!(left.leaves() + right.leaves(), node.leaves());
                        assert_eq!(left.degree() + right.degree(), node.degree());
                        let product = left.poly() * right.poly();
                        assert!(product.equals(node.poly()) == u32::MAX);
                        stack.push(left);
                        stack.push(right);
                    }
                    (None, None) => assert_eq!(node.leaves(), 1),
                    _ => panic!("node with a single child"),
                }
            }
        }
    }

    #[test]
    fn test_remainders_evaluate() {
        let mut rng = DRNG::from_seed("product_tree_remainders".as_bytes());

        for n in LEAF_COUNTS {
            let roots = random_roots(&mut rng, n);
            let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);

            // Polynomials of smaller, equal and larger degree than the tree
            for d in [0, n / 2, n, 2 * n + 3] {
                let g = PR::rand(&mut rng, d + 1);
                let remainders = tree.remainders(&g);
                assert_eq!(remainders.len(), n);
                for (r, a) in remainders.iter().zip(roots.iter()) {
                    assert!(r.is_constant());
                    assert!(r[0].equals(&g.evaluate(a)) == u32::MAX);
                }
            }
        }
    }

    #[test]
    fn test_remainders_nonlinear_leaves() {
        let mut rng = DRNG::from_seed("product_tree_nonlinear".as_bytes());

        let leaves: Vec<PR> = [1, 2, 3, 2, 5, 1, 4]
            .iter()
            .map(|d| PR::rand_monic(&mut rng, *d))
            .collect();
        let tree: ProductTree<Fp2> = ProductTree::new(&leaves);
        assert_eq!(tree.degree(), 18);

        let g = PR::rand(&mut rng, 40);
        let remainders = multieval_unscaled(&g, &tree, tree.leaves());
        for (r, f) in remainders.iter().zip(leaves.iter()) {
            assert!(r.equals(&g.remainder(f)) == u32::MAX);
        }
    }

    #[test]
    fn test_scaled_matches_unscaled() {
        let mut rng = DRNG::from_seed("product_tree_scaled".as_bytes());

        for n in LEAF_COUNTS {
            let roots = random_roots(&mut rng, n);
            let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);

            for d in [0, 1, n - 1, n, 3 * n] {
                let g = PR::rand(&mut rng, d + 1);
                let scaled = tree.scaled_remainders(&g);
                let unscaled = tree.remainders(&g);
                assert_eq!(scaled.len(), n);
                for (s, u) in scaled.iter().zip(unscaled.iter()) {
                    assert!(s.equals(u) == u32::MAX);
                }
            }
        }
    }

    #[test]
    fn test_scaled_non_monic_leaves() {
        let mut rng = DRNG::from_seed("product_tree_non_monic".as_bytes());

        // Leaves a_i * x - b_i give g(b_i / a_i) / a_i
        let n = 9;
        let a: Vec<Fp2> = (0..n).map(|_| Fp2::rand(&mut rng)).collect();
        let b: Vec<Fp2> = (0..n).map(|_| Fp2::rand(&mut rng)).collect();
        let leaves: Vec<PR> = a
            .iter()
            .zip(b.iter())
            .map(|(ai, bi)| PR::new_from_slice(&[-*bi, *ai]))
            .collect();
        let tree: ProductTree<Fp2> = ProductTree::new(&leaves);

        let g = PR::rand(&mut rng, 20);
        let scaled = tree.scaled_remainders(&g);
        for i in 0..n {
            let expected = g.evaluate(&(b[i] / a[i]));
            assert!((scaled[i][0] * a[i]).equals(&expected) == u32::MAX);
        }
    }

    #[test]
    fn test_tree_resultant() {
        let mut rng = DRNG::from_seed("product_tree_resultant".as_bytes());

        // All four parities of (leaf count, degree)
        for n in [4, 5, 16, 33] {
            let roots = random_roots(&mut rng, n);
            let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);
            let F = tree.poly().clone();

            for d in [1, 2, 7, 10, 40] {
                let g = PR::rand(&mut rng, d + 1);
                let res = tree.resultant(&g);
                assert!(res.equals(&g.resultant(&F)) == u32::MAX);

                // Up to sign this is the product of the evaluations.
                let mut expected = g.resultant_from_roots(&roots);
                if n % 2 == 1 && d % 2 == 1 {
                    expected.set_neg();
                }
                assert!(res.equals(&expected) == u32::MAX);
            }
        }
    }

    #[test]
    fn test_tree_resultant_common_root() {
        let mut rng = DRNG::from_seed("product_tree_common_root".as_bytes());

        // Leaves x - 1, ..., x - 4 and poly (x - 3)(x - 7)(x - 11)
        let small: Vec<Fp2> = (1..=4).map(Fp2::from_i32).collect();
        let tree: ProductTree<Fp2> = ProductTree::from_roots(&small);
        let g = PR::from_roots(&[Fp2::from_i32(3), Fp2::from_i32(7), Fp2::from_i32(11)]);
        assert!(tree.resultant(&g).is_zero() == u32::MAX);

        for n in [5, 16, 33] {
            let roots = random_roots(&mut rng, n);
            let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);
            for k in [0, n / 2, n - 1] {
                let g = PR::from_roots(&[Fp2::rand(&mut rng), roots[k], Fp2::rand(&mut rng)]);
                assert!(tree.resultant(&g).is_zero() == u32::MAX);

                // Only the leaf sharing the root is sent to zero.
                let remainders = tree.remainders(&g);
                for (i, r) in remainders.iter().enumerate() {
                    assert_eq!(r[0].is_zero() == u32::MAX, i == k);
                }
            }
        }
    }

    #[test]
    fn test_four_leaf_squares() {
        // x^2 modulo x - 1, ..., x - 4
        let roots: Vec<Fp2> = (1..=4).map(Fp2::from_i32).collect();
        let tree: ProductTree<Fp2> = ProductTree::from_roots(&roots);
        let g = PR::new_from_slice(&[Fp2::ZERO, Fp2::ZERO, Fp2::ONE]);

        let unscaled = tree.remainders(&g);
        let scaled = tree.scaled_remainders(&g);
        for (i, expected) in [1, 4, 9, 16].into_iter().enumerate() {
            let expected = Fp2::from_i32(expected);
            assert!(unscaled[i].is_constant());
            assert!(unscaled[i][0].equals(&expected) == u32::MAX);
            assert!(scaled[i][0].equals(&expected) == u32::MAX);
        }
    }

    #[test]
    #[should_panic(expected = "scaled remainder trees need linear leaves")]
    fn test_scaled_rejects_nonlinear_leaves() {
        let mut rng = DRNG::from_seed("product_tree_scaled_nonlinear".as_bytes());
        let leaves: Vec<PR> = [1, 2, 1].iter().map(|d| PR::rand_monic(&mut rng, *d)).collect();
        let tree: ProductTree<Fp2> = ProductTree::new(&leaves);
        let g = PR::rand(&mut rng, 8);
        tree.scaled_remainders(&g);
    }

    #[test]
    fn test_empty_and_single_leaf() {
        let mut rng = DRNG::from_seed("product_tree_small".as_bytes());
        let g = PR::rand(&mut rng, 6);

        let empty: ProductTree<Fp2> = ProductTree::new(&[]);
        assert_eq!(empty.leaves(), 0);
        assert!(empty.poly().equals(&PR::one()) == u32::MAX);
        assert!(empty.remainders(&g)[0].equals(&PR::one()) == u32::MAX);
        assert!(empty.scaled_remainders(&g)[0].equals(&PR::one()) == u32::MAX);
        assert!(empty.resultant(&g).equals(&Fp2::ONE) == u32::MAX);

        let r = Fp2::rand(&mut rng);
        let single: ProductTree<Fp2> = ProductTree::from_roots(&[r]);
        assert!(single.left().is_none() && single.right().is_none());
        assert!(single.poly().equals(&PR::from_root(&r)) == u32::MAX);
        let expected = g.evaluate(&r);
        assert!(single.remainders(&g)[0][0].equals(&expected) == u32::MAX);
        assert!(single.scaled_remainders(&g)[0][0].equals(&expected) == u32::MAX);
    }
}

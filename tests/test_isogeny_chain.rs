#![allow(non_snake_case)]

#[cfg(test)]
mod isogeny_chain_test {
    use std::{cell::RefCell, rc::Rc};

    use isogeny::{
        IsogenyError,
        elliptic::{
            isogeny_chain::{
                CompositeIsogeny, IsogenyDomain, PrimeIsogeny, StrategyParams,
                sparse_prime_power_chain, split_point,
            },
            velu::VeluAlgorithm,
        },
    };

    /// The cyclic group Z/nZ. The quotient by its subgroup of order ell is
    /// x -> x mod (n / ell). Every scalar multiplication is logged so that
    /// the shape of a strategy can be checked.
    #[derive(Clone, Debug)]
    struct Cyclic {
        order: u128,
        log: Rc<RefCell<Vec<(usize, usize)>>>,
    }

    #[derive(Clone, Debug)]
    struct CyclicStep {
        degree: usize,
        domain_order: u128,
        algorithm: VeluAlgorithm,
        codomain: Cyclic,
    }

    impl Cyclic {
        fn new(order: u128) -> Self {
            Self {
                order,
                log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn order_of(&self, x: u128) -> u128 {
            let mut a = x;
            let mut b = self.order;
            while b != 0 {
                (a, b) = (b, a % b);
            }
            self.order / a
        }
    }

    impl IsogenyDomain for Cyclic {
        type Point = u128;
        type Isogeny = CyclicStep;

        fn contains(&self, P: &u128) -> bool {
            *P < self.order
        }

        fn is_identity(&self, P: &u128) -> bool {
            *P == 0
        }

        fn mul_prime_power(&self, P: &u128, ell: usize, e: usize) -> u128 {
            self.log.borrow_mut().push((ell, e));
            let mut x = *P;
            for _ in 0..e {
                x = (x * ell as u128) % self.order;
            }
            x
        }

        fn mul_factorisation(&self, P: &u128, factors: &[(usize, usize)]) -> u128 {
            let mut x = *P;
            for (ell, e) in factors {
                for _ in 0..*e {
                    x = (x * *ell as u128) % self.order;
                }
            }
            x
        }

        fn prime_isogeny(
            &self,
            K: &u128,
            ell: usize,
            algorithm: VeluAlgorithm,
        ) -> Result<CyclicStep, IsogenyError> {
            if self.order_of(*K) != ell as u128 {
                return Err(IsogenyError::WrongOrder {
                    order: ell.to_string(),
                });
            }
            Ok(CyclicStep {
                degree: ell,
                domain_order: self.order,
                algorithm,
                codomain: Cyclic {
                    order: self.order / ell as u128,
                    log: self.log.clone(),
                },
            })
        }
    }

    impl PrimeIsogeny for CyclicStep {
        type Point = u128;
        type Domain = Cyclic;

        fn degree(&self) -> usize {
            self.degree
        }

        fn codomain(&self) -> &Cyclic {
            &self.codomain
        }

        fn eval(&self, P: &u128) -> u128 {
            *P % self.codomain.order
        }
    }

    #[test]
    fn test_chain_shape() {
        for k in 1..=20 {
            for split in [0.2, 0.5, 0.8] {
                let G = Cyclic::new(3u128.pow(k as u32) * 5);
                let params = StrategyParams::default().with_split(split);

                // 5 generates the subgroup of order 3^k
                let steps = sparse_prime_power_chain(&G, &5, 3, k, &params).unwrap();
                assert_eq!(steps.len(), k);
                for (i, step) in steps.iter().enumerate() {
                    assert_eq!(step.degree(), 3);
                    assert_eq!(step.domain_order, 3u128.pow((k - i) as u32) * 5);
                }
                assert_eq!(steps[k - 1].codomain().order, 5);
            }
        }
    }

    #[test]
    fn test_far_then_near() {
        let G = Cyclic::new(2u128.pow(10));
        let params = StrategyParams::default();
        sparse_prime_power_chain(&G, &1, 2, 10, &params).unwrap();

        // k = 10 splits as 8 + 2: first Q1 = [2^8]Q, the far half of length
        // 2 then splits as 1 + 1. The near half of length 8 follows.
        let log = G.log.borrow();
        assert_eq!(log[0], (2, split_point(10, 0.8)));
        assert_eq!(log[0], (2, 8));
        assert_eq!(log[1], (2, 1));
        assert_eq!(log[2], (2, split_point(8, 0.8)));

        // One multiplication per internal node of the recursion.
        assert_eq!(log.len(), 9);
    }

    #[test]
    fn test_algorithm_selection() {
        let G = Cyclic::new(401 * 401);
        let params = StrategyParams::default();
        let steps = sparse_prime_power_chain(&G, &1, 401, 2, &params).unwrap();
        assert!(steps.iter().all(|s| s.algorithm == VeluAlgorithm::SquareRoot));

        let G = Cyclic::new(397 * 397);
        let steps = sparse_prime_power_chain(&G, &1, 397, 2, &params).unwrap();
        assert!(steps.iter().all(|s| s.algorithm == VeluAlgorithm::Direct));

        let params = params.with_velu_bound(100);
        let steps = sparse_prime_power_chain(&G, &1, 397, 2, &params).unwrap();
        assert!(steps.iter().all(|s| s.algorithm == VeluAlgorithm::SquareRoot));
    }

    #[test]
    fn test_planner_rejects_input() {
        let G = Cyclic::new(16);
        let params = StrategyParams::default();
        assert_eq!(
            sparse_prime_power_chain(&G, &1, 2, 0, &params).unwrap_err(),
            IsogenyError::InvalidFactor { ell: 2, e: 0 }
        );
        assert_eq!(
            sparse_prime_power_chain(&G, &1, 4, 2, &params).unwrap_err(),
            IsogenyError::InvalidFactor { ell: 4, e: 2 }
        );
        assert_eq!(
            sparse_prime_power_chain(&G, &1, 2, 4, &params.with_split(1.5)).unwrap_err(),
            IsogenyError::InvalidSplit(1.5)
        );

        // A generator of order 2^3 cannot give a chain of length 4.
        assert!(sparse_prime_power_chain(&G, &2, 2, 4, &params).is_err());
    }

    #[test]
    fn test_composite_images() {
        // Z/(2^5 * 3^3 * 7) with kernel of order 2^3 * 3 * 7
        let M = 32 * 27 * 7;
        let N = 8 * 3 * 7;
        let G = Cyclic::new(M);
        let K = M / N;

        let points = [1, 5, 100, M - 1];
        let mut images = points;
        let phi =
            CompositeIsogeny::new(&G, &K, N, &StrategyParams::default(), &mut images).unwrap();

        assert_eq!(phi.degree_factors(), &[(2, 3), (3, 1), (7, 1)]);
        assert_eq!(phi.degree(), Ok(N));
        assert_eq!(phi.codomain().order, M / N);
        assert_eq!(phi.domain().order, M);

        let degrees: Vec<usize> = phi.steps().iter().map(|s| s.degree()).collect();
        assert_eq!(degrees, vec![2, 2, 2, 3, 7]);

        for (x, y) in points.iter().zip(images.iter()) {
            assert_eq!(*y, x % (M / N));
            assert_eq!(phi.eval(x), *y);
        }

        let mut batch = points;
        phi.eval_into(&mut batch);
        assert_eq!(batch, images);
    }

    #[test]
    fn test_composite_factor_order() {
        // The factorisation is processed in the order it is given.
        let M = 5 * 9 * 4;
        let G = Cyclic::new(M);
        let phi = CompositeIsogeny::from_factorisation(
            &G,
            &1,
            &[(5, 1), (2, 2), (3, 2)],
            &StrategyParams::default(),
            &mut [],
        )
        .unwrap();
        let degrees: Vec<usize> = phi.steps().iter().map(|s| s.degree()).collect();
        assert_eq!(degrees, vec![5, 2, 2, 3, 3]);
        assert_eq!(phi.codomain().order, 1);
    }

    #[test]
    fn test_identity() {
        let G = Cyclic::new(12);
        let mut images = [7, 11];
        let phi = CompositeIsogeny::new(&G, &3, 1, &StrategyParams::default(), &mut images)
            .unwrap();
        assert!(phi.steps().is_empty());
        assert!(phi.degree_factors().is_empty());
        assert_eq!(phi.degree(), Ok(1));
        assert_eq!(images, [7, 11]);
        assert_eq!(phi.eval(&5), 5);
        assert_eq!(phi.codomain().order, 12);

        let phi = CompositeIsogeny::from_factorisation(
            &G,
            &3,
            &[],
            &StrategyParams::default(),
            &mut images,
        )
        .unwrap();
        assert!(phi.steps().is_empty());
    }

    #[test]
    fn test_composite_rejects_input() {
        let G = Cyclic::new(8 * 9);
        let params = StrategyParams::default();

        // Not in the group.
        assert_eq!(
            CompositeIsogeny::new(&G, &100, 72, &params, &mut []).unwrap_err(),
            IsogenyError::NotOnCurve
        );

        // [N]P != 0
        assert_eq!(
            CompositeIsogeny::new(&G, &1, 36, &params, &mut []).unwrap_err(),
            IsogenyError::WrongOrder {
                order: "2^2 * 3^2".to_string()
            }
        );

        // [N / 3]P = 0
        assert_eq!(
            CompositeIsogeny::new(&G, &3, 72, &params, &mut []).unwrap_err(),
            IsogenyError::WrongOrder {
                order: "2^3 * 3^2".to_string()
            }
        );

        assert_eq!(
            CompositeIsogeny::from_factorisation(&G, &1, &[(4, 1)], &params, &mut [])
                .unwrap_err(),
            IsogenyError::InvalidFactor { ell: 4, e: 1 }
        );

        assert_eq!(
            CompositeIsogeny::new(&G, &1, 72, &params.with_split(0.0), &mut []).unwrap_err(),
            IsogenyError::InvalidSplit(0.0)
        );

        assert_eq!(
            CompositeIsogeny::new(&G, &1, 0, &params, &mut []).unwrap_err(),
            IsogenyError::InvalidFactor { ell: 0, e: 1 }
        );
    }
}

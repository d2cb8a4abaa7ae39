// p = 2^3 * 3^2 * 5 * 7 * ... * 97 * 163^16 - 1, so that every prime
// up to 97 and 163^16 divide the order p + 1 of a supersingular curve
// over GF(p^2).
pub const SMOOTH_MODULUS: [u64; 4] = [
    0x65396406224d1bc7,
    0x60892bae5986e2f3,
    0x8f2e6d4fb53f8cc7,
    0x0003e368df883c71,
];

/// The factorisation of p + 1.
pub const SMOOTH_CARDINALITY_FACTORS: [(usize, usize); 26] = [
    (2, 3),
    (3, 2),
    (5, 1),
    (7, 1),
    (11, 1),
    (13, 1),
    (17, 1),
    (19, 1),
    (23, 1),
    (29, 1),
    (31, 1),
    (37, 1),
    (41, 1),
    (43, 1),
    (47, 1),
    (53, 1),
    (59, 1),
    (61, 1),
    (67, 1),
    (71, 1),
    (73, 1),
    (79, 1),
    (83, 1),
    (89, 1),
    (97, 1),
    (163, 16),
];

fp2::define_fp2_from_modulus!(
    typename = SmoothFp2,
    base_typename = SmoothFp,
    modulus = SMOOTH_MODULUS,
);

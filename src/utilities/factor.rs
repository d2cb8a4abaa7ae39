//! Trial division helpers for the (smooth, public) degrees of isogenies.

use crate::{
    error::IsogenyError,
    utilities::bn::{bn_to_u128_vartime, factorisation_to_bn_vartime},
};

/// Return true when n is prime. Trial division, only intended for the small
/// primes which appear as degrees of atomic isogenies.
pub fn is_prime_vartime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Factor n into [(ell_0, e_0), (ell_1, e_1), ...] with ell_0 < ell_1 < ...
/// by trial division. The running time is governed by the second largest
/// prime factor, so n is expected to be smooth.
pub fn factor_u128_vartime(mut n: u128) -> Result<Vec<(usize, usize)>, IsogenyError> {
    let mut factors = Vec::new();
    if n <= 1 {
        return Ok(factors);
    }

    let mut d: u128 = 2;
    while d <= n / d {
        if n % d == 0 {
            let mut e = 0;
            while n % d == 0 {
                n /= d;
                e += 1;
            }
            factors.push((d as usize, e));
        }
        d += if d == 2 { 1 } else { 2 };
    }
    if n > 1 {
        let ell = usize::try_from(n).map_err(|_| IsogenyError::DegreeOverflow)?;
        factors.push((ell, 1));
    }

    Ok(factors)
}

/// Return prod(ell_i^e_i) as a u128.
pub fn factorisation_to_u128(factors: &[(usize, usize)]) -> Result<u128, IsogenyError> {
    bn_to_u128_vartime(&factorisation_to_bn_vartime(factors)).ok_or(IsogenyError::DegreeOverflow)
}

/// Check that every entry of a factorisation is a prime with a positive exponent.
pub fn check_factorisation(factors: &[(usize, usize)]) -> Result<(), IsogenyError> {
    for (ell, e) in factors.iter() {
        if *e == 0 || !is_prime_vartime(*ell) {
            return Err(IsogenyError::InvalidFactor { ell: *ell, e: *e });
        }
    }
    Ok(())
}

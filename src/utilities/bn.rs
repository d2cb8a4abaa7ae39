//! Minimal variable-time big integers represented as little endian `u64`
//! words. Only used for public scalars such as the cofactors which appear
//! while clearing torsion during an isogeny chain.

/// Given an integer `a` represented with little endian u64 words, return the number
/// of leading zeros of the binary representation.
fn bn_leading_zeros_vartime(a: &[u64]) -> u32 {
    let mut leading_zeros: u32 = 0;
    for word in a.iter().rev() {
        leading_zeros += word.leading_zeros();
        if *word != 0 {
            break;
        }
    }

    leading_zeros
}

/// Return the bit length of an integer `a` represented as little endian words.
pub fn bn_bit_length_vartime(a: &[u64]) -> usize {
    (a.len() << 6) - (bn_leading_zeros_vartime(a) as usize)
}

/// Set a <- a * x, growing `a` by one word whenever the product carries out.
pub fn bn_mul_u64_vartime(a: &mut Vec<u64>, x: u64) {
    let mut carry = 0u64;
    for w in a.iter_mut() {
        let t = (*w as u128) * (x as u128) + (carry as u128);
        *w = t as u64;
        carry = (t >> 64) as u64;
    }
    if carry != 0 {
        a.push(carry);
    }
}

/// Return x^e as a big integer.
pub fn prime_power_to_bn_vartime(x: usize, e: usize) -> Vec<u64> {
    // If x^e fits inside a word, then we can just finish here.
    let n_bitlength = ((usize::BITS - x.leading_zeros()) as usize) * e;
    if n_bitlength <= 64 {
        return vec![(x as u64).pow(e as u32)];
    }

    let mut n = vec![1u64];
    for _ in 0..e {
        bn_mul_u64_vartime(&mut n, x as u64);
    }
    n
}

/// Return prod(ell_i^e_i) as a big integer given the factorisation
/// [(ell_0, e_0), (ell_1, e_1), ...].
pub fn factorisation_to_bn_vartime(factorisation: &[(usize, usize)]) -> Vec<u64> {
    let mut n = vec![1u64];
    for (ell, e) in factorisation.iter() {
        for _ in 0..*e {
            bn_mul_u64_vartime(&mut n, *ell as u64);
        }
    }
    n
}

/// Return the integer as a u128 if it fits, otherwise None.
pub fn bn_to_u128_vartime(a: &[u64]) -> Option<u128> {
    if bn_bit_length_vartime(a) > 128 {
        return None;
    }
    let lo = a.first().copied().unwrap_or(0) as u128;
    let hi = a.get(1).copied().unwrap_or(0) as u128;
    Some(lo | (hi << 64))
}

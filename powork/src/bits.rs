use bitvec::prelude::*;
use rand::Rng;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::PoWorkError;

pub type Bits = BitVec<u8, Msb0>;
pub type BitsSlice = BitSlice<u8, Msb0>;

/// Lowest `size` bits of `input`, most significant first. Bits above 64 are zero.
pub fn to_bits(input: u64, size: usize) -> Bits {
    let bytes = input.to_be_bytes();
    let view = bytes.view_bits::<Msb0>();
    let mut bits = Bits::with_capacity(size);
    if size > view.len() {
        bits.resize(size - view.len(), false);
        bits.extend_from_bitslice(view);
    } else {
        bits.extend_from_bitslice(&view[view.len() - size..]);
    }
    bits
}

/// Reads an MSB-first bit string as an integer, `None` when it does not fit in 64 bits.
pub fn from_bits(input: &BitsSlice) -> Option<u64> {
    let significant = match input.first_one() {
        Some(start) => &input[start..],
        None => return Some(0),
    };
    if significant.len() > 64 {
        return None;
    }
    Some(significant.load_be::<u64>())
}

/// A nonce is a bit string whose width is part of its value: `010` and `10`
/// are different nonces because they hash differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nonce {
    bits: Bits,
}

impl Nonce {
    pub fn empty() -> Self {
        Nonce { bits: Bits::new() }
    }

    /// `value` rendered on exactly `width` bits.
    pub fn from_value(value: u64, width: usize) -> Self {
        Nonce {
            bits: to_bits(value, width),
        }
    }

    /// Uniformly random bit string of exactly `width` bits.
    pub fn random<R: Rng>(width: usize, rng: &mut R) -> Self {
        let mut bytes = vec![0u8; (width + 7) / 8];
        rng.fill(&mut bytes[..]);
        Nonce {
            bits: bytes.view_bits::<Msb0>()[..width].to_bitvec(),
        }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn value(&self) -> Option<u64> {
        from_bits(&self.bits)
    }

    /// Integer sum, rendered on the minimal number of bits (a zero sum is empty).
    pub fn add(&self, addend: u64) -> Self {
        let mut reversed = Vec::with_capacity(self.width().max(64) + 1);
        let mut remaining = addend;
        let mut carry = false;
        let mut index = self.bits.len();

        while index > 0 || remaining != 0 || carry {
            let left = if index > 0 {
                index -= 1;
                self.bits[index]
            } else {
                false
            };
            let right = remaining & 1 == 1;
            remaining >>= 1;

            reversed.push(left ^ right ^ carry);
            carry = (left && right) || (carry && (left ^ right));
        }

        let mut bits = Bits::with_capacity(reversed.len());
        for bit in reversed.into_iter().rev().skip_while(|bit| !*bit) {
            bits.push(bit);
        }
        Nonce { bits }
    }

    /// `prefix` followed by `self`, as a bit concatenation.
    pub fn prepend(&self, prefix: &Nonce) -> Self {
        let mut bits = Bits::with_capacity(prefix.width() + self.width());
        bits.extend_from_bitslice(&prefix.bits);
        bits.extend_from_bitslice(&self.bits);
        Nonce { bits }
    }

    /// Appends the literal binary digits (ASCII `0`/`1`, no prefix) to `out`.
    pub fn write_text(&self, out: &mut Vec<u8>) {
        out.reserve(self.width());
        for bit in self.bits.iter() {
            out.push(if *bit { b'1' } else { b'0' });
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = Vec::with_capacity(self.width());
        self.write_text(&mut text);
        text.into_iter().map(char::from).collect()
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Nonce {
    type Err = PoWorkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Bits::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => return Err(PoWorkError::InvalidNonce(other)),
            }
        }
        Ok(Nonce { bits })
    }
}

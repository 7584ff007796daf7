use hashpuzzle_crypto::Hash;

use crate::bits::Nonce;
use crate::difficulty::Difficulty;

/// SHA-256 of the nonce's binary digits followed by the payload.
pub fn digest(nonce: &Nonce, payload: &[u8]) -> Hash {
    let mut text = Vec::with_capacity(nonce.width());
    nonce.write_text(&mut text);
    Hash::concat_and_hash(&[&text[..], payload])
}

/// True iff the lowest `difficulty` bits of the 256-bit digest are zero.
pub fn meets_difficulty(digest: &Hash, difficulty: Difficulty) -> bool {
    digest.trailing_zeros() >= difficulty.bits()
}

pub fn verify(nonce: &Nonce, payload: &[u8], difficulty: Difficulty) -> bool {
    meets_difficulty(&digest(nonce, payload), difficulty)
}

/// Digest evaluation bound to one payload and difficulty, reusing its text buffer.
#[derive(Debug)]
pub struct DigestEvaluator<'p> {
    payload: &'p [u8],
    difficulty: Difficulty,
    text: Vec<u8>,
}

impl<'p> DigestEvaluator<'p> {
    pub fn new(payload: &'p [u8], difficulty: Difficulty) -> Self {
        DigestEvaluator {
            payload,
            difficulty,
            text: Vec::new(),
        }
    }

    pub fn evaluate(&mut self, nonce: &Nonce) -> Hash {
        self.text.clear();
        nonce.write_text(&mut self.text);
        Hash::concat_and_hash(&[&self.text[..], self.payload])
    }

    pub fn meets_difficulty(&self, digest: &Hash) -> bool {
        meets_difficulty(digest, self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_with_last_bytes(last: &[u8]) -> Hash {
        let mut bytes = [0xffu8; Hash::LENGTH];
        bytes[Hash::LENGTH - last.len()..].copy_from_slice(last);
        Hash::new(bytes)
    }

    #[test]
    fn test_digest_hashes_binary_text() {
        let nonce: Nonce = "11".parse().unwrap();
        assert_eq!(digest(&nonce, b"holamundo"), Hash::hash(b"11holamundo"));

        let padded: Nonce = "011".parse().unwrap();
        assert_eq!(digest(&padded, b"holamundo"), Hash::hash(b"011holamundo"));
        assert_ne!(digest(&padded, b"holamundo"), digest(&nonce, b"holamundo"));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let nonce: Nonce = "1001".parse().unwrap();
        assert_eq!(digest(&nonce, b"payload"), digest(&nonce, b"payload"));

        let mut evaluator = DigestEvaluator::new(b"payload", Difficulty::new(0).unwrap());
        let first = evaluator.evaluate(&nonce);
        evaluator.evaluate(&"1".parse().unwrap());
        assert_eq!(evaluator.evaluate(&nonce), first);
        assert_eq!(first, digest(&nonce, b"payload"));
    }

    #[test]
    fn test_empty_nonce_hashes_payload_only() {
        assert_eq!(digest(&Nonce::empty(), b"holamundo"), Hash::hash(b"holamundo"));
    }

    #[test]
    fn test_meets_difficulty() {
        let d = |bits| Difficulty::new(bits).unwrap();
        let hash = hash_with_last_bytes(&[0b1000_0000, 0]);

        assert!(meets_difficulty(&hash, d(0)));
        assert!(meets_difficulty(&hash, d(8)));
        assert!(meets_difficulty(&hash, d(15)));
        assert!(!meets_difficulty(&hash, d(16)));
        assert_eq!(meets_difficulty(&hash, d(15)), meets_difficulty(&hash, d(15)));

        let odd = hash_with_last_bytes(&[0x01]);
        assert!(meets_difficulty(&odd, d(0)));
        assert!(!meets_difficulty(&odd, d(1)));
    }

    #[test]
    fn test_meets_difficulty_uses_fixed_width() {
        // Leading zero bytes must not shorten the digest.
        let mut bytes = [0u8; Hash::LENGTH];
        bytes[Hash::LENGTH - 1] = 0b0000_0100;
        let hash = Hash::new(bytes);
        assert!(meets_difficulty(&hash, Difficulty::new(2).unwrap()));
        assert!(!meets_difficulty(&hash, Difficulty::new(3).unwrap()));

        assert!(meets_difficulty(&Hash::zero(), Difficulty::new(256).unwrap()));
    }

    #[test]
    fn test_verify() {
        let payload = b"holamundo";
        let nonce: Nonce = "11".parse().unwrap();
        let zeros = digest(&nonce, payload).trailing_zeros() as i64;
        assert!(verify(&nonce, payload, Difficulty::new(zeros).unwrap()));
        assert!(!verify(&nonce, payload, Difficulty::new(zeros + 1).unwrap()));
    }
}

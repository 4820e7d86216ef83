//! Deterministic bag-of-words embedder.
//!
//! Each lowercase ASCII-alphanumeric token is hashed with FNV-1a into one of `dim`
//! buckets, then the vector is L2-normalized. No model, no network: texts sharing
//! words land close together, which is enough for offline runs and tests.

use std::{future::Future, pin::Pin};

use crate::{EmbeddingsProvider, FaqStoreError};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// `dim` is clamped to at least 8.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];

        let lower = text.to_ascii_lowercase();
        for token in lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut h = FNV_OFFSET;
            for b in token.as_bytes() {
                h ^= u64::from(*b);
                h = h.wrapping_mul(FNV_PRIME);
            }
            v[(h % self.dim as u64) as usize] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl EmbeddingsProvider for HashEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, FaqStoreError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.embed_sync(text)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::cosine;

    #[test]
    fn same_text_same_vector() {
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed_sync("What is X?"), e.embed_sync("what is x"));
    }

    #[test]
    fn vectors_are_unit_length() {
        let v = HashEmbedder::new(32).embed_sync("refund policy for orders");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let v = HashEmbedder::new(16).embed_sync("  ?! ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn shared_words_score_higher() {
        let e = HashEmbedder::default();
        let q = e.embed_sync("how do I reset my password");
        let near = e.embed_sync("reset password instructions");
        let far = e.embed_sync("shipping takes three days");
        assert!(cosine(&q, &near) > cosine(&q, &far));
    }

    #[test]
    fn dim_is_clamped() {
        assert_eq!(HashEmbedder::new(2).dim(), 8);
    }
}

//! BLAKE3-derived identifiers.
//!
//! Vector stores such as Qdrant only accept numeric or UUID point ids, while records here are
//! keyed by strings (`resume_<id>`, `job_<row>`). Point ids are derived from those strings so
//! re-ingesting the same record overwrites it instead of duplicating it.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits the birthday bound sits around 4.3 billion items; the resume and job
/// collections are many orders of magnitude smaller, so a collision is negligible. The original
/// string id is stored alongside the point and returned to callers, never the hash.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Numeric point id for a string record id, scoped by collection.
#[inline]
pub fn point_id_for_record(collection: &str, record_id: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(collection.as_bytes());
    hasher.update(b"|");
    hasher.update(record_id.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Bucket and sign for a token in a feature-hashed vector of `dim` slots.
///
/// Used by the stub embedder; the sign bit halves the bias that colliding tokens add to
/// unrelated texts.
#[inline]
pub fn token_bucket(token: &str, dim: usize) -> (usize, f32) {
    let h = hash_to_u64(token.as_bytes());
    let bucket = (h % dim.max(1) as u64) as usize;
    let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
    (bucket, sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"resume_10554236";

        let hash1 = hash_to_u64(data);
        let hash2 = hash_to_u64(data);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_to_u64_uniqueness() {
        let inputs = [
            b"job_1".as_slice(),
            b"job_2".as_slice(),
            b"JOB_1".as_slice(),
            b"job_1 ".as_slice(),
        ];

        let hashes: Vec<_> = inputs.iter().map(|i| hash_to_u64(i)).collect();
        let unique_hashes: HashSet<_> = hashes.iter().collect();

        assert_eq!(unique_hashes.len(), inputs.len());
    }

    #[test]
    fn test_point_id_is_collection_scoped() {
        let a = point_id_for_record("resumes", "resume_1");
        let b = point_id_for_record("job_descriptions", "resume_1");
        assert_ne!(a, b);
        assert_eq!(a, point_id_for_record("resumes", "resume_1"));
    }

    #[test]
    fn test_point_id_separator_prevents_ambiguity() {
        let a = point_id_for_record("ab", "cd");
        let b = point_id_for_record("abc", "d");
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_bucket_in_range() {
        for token in ["python", "aws", "kubernetes", "cashier", ""] {
            let (bucket, sign) = token_bucket(token, 384);
            assert!(bucket < 384);
            assert!(sign == 1.0 || sign == -1.0);
        }
    }

    #[test]
    fn test_token_bucket_zero_dim_does_not_panic() {
        let (bucket, _) = token_bucket("anything", 0);
        assert_eq!(bucket, 0);
    }
}

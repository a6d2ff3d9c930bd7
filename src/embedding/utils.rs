use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Loads `<model_dir>/tokenizer.json`, truncating to `max_len` tokens without padding.
///
/// Resumes routinely exceed the encoder's position table.
pub fn load_tokenizer_with_truncation(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(io::Error::other)?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(io::Error::other)?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

/// Lowercased alphanumeric words of `text`.
pub fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Scales `v` to unit length in place; zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens_splits_and_lowercases() {
        let tokens: Vec<String> = word_tokens("Senior Engineer, AWS/K8s!").collect();
        assert_eq!(tokens, vec!["senior", "engineer", "aws", "k8s"]);
    }

    #[test]
    fn test_word_tokens_empty() {
        assert_eq!(word_tokens("  --  ").count(), 0);
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_load_tokenizer_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tokenizer_with_truncation(dir.path(), 16).is_err());
    }
}

use substrate_core::compression::Algorithm;
use substrate_core::errors::SubstrateError;
use substrate_core::SubstrateResult;

/// Deterministic variant assignment: the same `(experiment_id, session_id)`
/// pair always maps to the same variant, across processes and calls.
pub fn assign_variant(experiment_id: &str, session_id: &str, variants: &[Algorithm]) -> SubstrateResult<Algorithm> {
    if session_id.is_empty() {
        return Err(SubstrateError::InvalidArgs("session_id must not be empty".into()));
    }
    if variants.is_empty() {
        return Err(SubstrateError::InvalidArgs("experiment has no variants".into()));
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(experiment_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(session_id.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest.as_bytes()[..8].try_into().expect("blake3 digest is at least 8 bytes");
    let h = u64::from_be_bytes(bytes);

    let index = (h % variants.len() as u64) as usize;
    Ok(variants[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_always_assign_the_same_variant() {
        let variants = vec![Algorithm::Extractive, Algorithm::Abstractive, Algorithm::Hybrid];
        let first = assign_variant("exp-1", "session-42", &variants).unwrap();
        for _ in 0..10_000 {
            assert_eq!(assign_variant("exp-1", "session-42", &variants).unwrap(), first);
        }
    }

    #[test]
    fn empty_session_id_is_rejected() {
        let variants = vec![Algorithm::Extractive, Algorithm::Abstractive];
        assert!(assign_variant("exp-1", "", &variants).is_err());
    }

    #[test]
    fn distribution_roughly_matches_uniform_weights() {
        let variants = vec![Algorithm::Extractive, Algorithm::Abstractive];
        let n = 4000;
        let mut counts = [0u32; 2];
        for i in 0..n {
            let session = format!("session-{i}");
            let algo = assign_variant("exp-dist", &session, &variants).unwrap();
            counts[variants.iter().position(|v| *v == algo).unwrap()] += 1;
        }
        let expected = n as f64 / variants.len() as f64;
        for count in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.15, "deviation {deviation} too large for count {count}");
        }
    }
}

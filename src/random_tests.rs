//! Large-trial statistical checks for `Random::random_uint`, kept out of
//! `random.rs`'s own test module since they run far more trials than
//! anything else in that file.

#[cfg(test)]
mod tests {
    use crate::random::Random;

    #[test]
    fn uniform_uint_bucket_counts_stay_in_band_at_700k_trials() {
        let r = Random::new();
        r.initialize_user_rng(b"statistical test seed - 700k").unwrap();

        let trials = 700_000u32;
        let mut buckets = [0u32; 7];
        for _ in 0..trials {
            let v = r.random_uint(7).unwrap() as usize;
            buckets[v] += 1;
        }

        for count in buckets {
            assert!(
                (95_000..=105_000).contains(&count),
                "bucket count {count} outside [95000, 105000]"
            );
        }
    }

    #[test]
    fn uniform_uint_stays_within_three_sigma_at_one_million_trials() {
        let r = Random::new();
        r.initialize_user_rng(b"statistical test seed - 1M").unwrap();

        let limit = 7u32;
        let trials = 1_000_000u64;
        let mut buckets = [0u64; 7];
        for _ in 0..trials {
            let v = r.random_uint(limit).unwrap() as usize;
            buckets[v] += 1;
        }

        let p = 1.0 / limit as f64;
        let expected = trials as f64 * p;
        let three_sigma = 3.0 * (trials as f64 * p * (1.0 - p)).sqrt();

        for count in buckets {
            let diff = (count as f64 - expected).abs();
            assert!(
                diff <= three_sigma,
                "bucket count {count} is {diff} from expected {expected}, exceeding 3 sigma ({three_sigma})"
            );
        }
    }
}

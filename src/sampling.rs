use rand::Rng;

/// Uniform draw over 1..=100; a hit means this session emits the pv-data
/// ping. Drawn at most once per coordinator lifetime — the result is cached
/// in `CoordinatorState::was_sampled`.
pub fn sample_hit(percentage: u8) -> bool {
    sample_hit_with(&mut rand::rng(), percentage)
}

pub fn sample_hit_with<R: Rng + ?Sized>(rng: &mut R, percentage: u8) -> bool {
    rng.random_range(1..=100u32) <= u32::from(percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_percent_never_hits() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1_000).all(|_| !sample_hit_with(&mut rng, 0)));
    }

    #[test]
    fn hundred_percent_always_hits() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1_000).all(|_| sample_hit_with(&mut rng, 100)));
    }

    #[test]
    fn one_percent_hit_rate_is_statistically_close() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let hits = (0..draws).filter(|_| sample_hit_with(&mut rng, 1)).count();
        let rate = hits as f64 / f64::from(draws);
        // 1% ± 0.3pp is ~10 sigma for 100k draws
        assert!((0.007..=0.013).contains(&rate), "rate was {rate}");
    }

    #[test]
    fn fifty_percent_hit_rate_is_statistically_close() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let hits = (0..draws).filter(|_| sample_hit_with(&mut rng, 50)).count();
        let rate = hits as f64 / f64::from(draws);
        assert!((0.49..=0.51).contains(&rate), "rate was {rate}");
    }
}

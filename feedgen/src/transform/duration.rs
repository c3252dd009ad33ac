//! Duration defaulting
//!
//! Records without a usable duration get a default. The random mode stands in
//! for unknown real durations; it is an approximation, and deployments choose
//! it explicitly in config (the compiled default is a fixed value).

use rand::Rng;

use feedgen_common::config::{DurationConfig, NonLiveDuration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationPolicy {
    floor_secs: u64,
    live_default_secs: u64,
    non_live: NonLiveDuration,
}

impl DurationPolicy {
    /// Caller guarantees defaults are >= floor (checked by config validation)
    pub fn new(config: &DurationConfig) -> Self {
        Self {
            floor_secs: config.floor_secs,
            live_default_secs: config.live_default_secs,
            non_live: config.non_live.clone(),
        }
    }

    pub fn floor_secs(&self) -> u64 {
        self.floor_secs
    }

    /// Duration to publish for a record
    ///
    /// A supplied duration at or above the floor is kept (fractional seconds
    /// dropped). Anything else gets the live or non-live default.
    pub fn resolve<R: Rng + ?Sized>(&self, supplied: Option<f64>, is_live: bool, rng: &mut R) -> u64 {
        if let Some(secs) = supplied {
            if secs.is_finite() && secs >= self.floor_secs as f64 {
                return secs.trunc() as u64;
            }
        }

        if is_live {
            return self.live_default_secs;
        }

        match self.non_live {
            NonLiveDuration::Fixed { seconds } => seconds,
            NonLiveDuration::Random { min, max } => rng.gen_range(min..=max),
        }
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::new(&DurationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_valid_durations_pass_through() {
        let policy = DurationPolicy::default();
        for secs in [60.0, 61.0, 599.9, 7200.0, 86_400.0] {
            assert_eq!(policy.resolve(Some(secs), false, &mut rng()), secs as u64);
            assert_eq!(policy.resolve(Some(secs), true, &mut rng()), secs as u64);
        }
    }

    #[test]
    fn test_short_or_missing_durations_use_fixed_default() {
        let policy = DurationPolicy::default();
        for supplied in [None, Some(0.0), Some(45.0), Some(59.99)] {
            assert_eq!(policy.resolve(supplied, false, &mut rng()), 300);
        }
    }

    #[test]
    fn test_live_default() {
        let policy = DurationPolicy::default();
        assert_eq!(policy.resolve(None, true, &mut rng()), 7200);
        assert_eq!(policy.resolve(Some(10.0), true, &mut rng()), 7200);
    }

    #[test]
    fn test_random_default_stays_in_range() {
        let policy = DurationPolicy::new(&DurationConfig {
            floor_secs: 60,
            live_default_secs: 7200,
            non_live: NonLiveDuration::Random { min: 120, max: 1200 },
        });
        let mut rng = rng();
        for _ in 0..500 {
            let d = policy.resolve(None, false, &mut rng);
            assert!((120..=1200).contains(&d), "{} out of range", d);
            assert!(d >= policy.floor_secs());
        }
    }
}

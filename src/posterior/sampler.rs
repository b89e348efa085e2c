use crate::{ArmId, Probability};
use rand::Rng;
use rand_distr::{Beta, Distribution};

/// Stateless Beta-posterior sampling and Monte Carlo estimation. Every method
/// takes the caller's RNG so seeding policy lives at the call site: a process
/// thread-local RNG in the service, a seeded `SmallRng` in tests.
pub struct PosteriorEngine;

impl PosteriorEngine {
    /// Draw one sample per arm, return the argmax (ties broken by lowest
    /// index) and an estimate of P(that arm is best) from `m_hot` further
    /// joint draws (Thompson Sample).
    pub fn thompson_sample(
        rng: &mut impl Rng,
        alphas: &[u64],
        betas: &[u64],
        m_hot: usize,
    ) -> (ArmId, Probability) {
        let dists = betas_for(alphas, betas);

        let draw: Vec<f64> = dists.iter().map(|d| d.sample(rng)).collect();
        let arm_id = argmax(&draw);

        let mut hits = 0usize;
        for _ in 0..m_hot {
            let round: Vec<f64> = dists.iter().map(|d| d.sample(rng)).collect();
            if argmax(&round) == arm_id {
                hits += 1;
            }
        }
        let p_best = hits as Probability / m_hot as Probability;
        (arm_id, p_best)
    }

    /// Monte Carlo P(arm k is best) for every arm, over `m_stop` joint draws
    /// (stopping rule). Returns a length-`n_arms` vector summing to 1
    /// within Monte Carlo noise.
    pub fn p_best_all(
        rng: &mut impl Rng,
        alphas: &[u64],
        betas: &[u64],
        m_stop: usize,
    ) -> Vec<Probability> {
        let dists = betas_for(alphas, betas);
        let mut wins = vec![0usize; dists.len()];
        for _ in 0..m_stop {
            let round: Vec<f64> = dists.iter().map(|d| d.sample(rng)).collect();
            wins[argmax(&round)] += 1;
        }
        wins.iter()
            .map(|&w| w as Probability / m_stop as Probability)
            .collect()
    }
}

fn betas_for(alphas: &[u64], betas: &[u64]) -> Vec<Beta<f64>> {
    alphas
        .iter()
        .zip(betas.iter())
        .map(|(&a, &b)| {
            Beta::new(a as f64, b as f64).expect("alpha, beta >= 1 by the prior floor")
        })
        .collect()
}

fn argmax(samples: &[f64]) -> ArmId {
    let mut best = 0;
    for (k, &v) in samples.iter().enumerate().skip(1) {
        if v > samples[best] {
            best = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn thompson_sample_picks_a_valid_arm() {
        let mut rng = rng();
        let (arm, p_best) = PosteriorEngine::thompson_sample(&mut rng, &[1, 1, 1], &[1, 1, 1], 1_000);
        assert!(arm < 3);
        assert!((0.0..=1.0).contains(&p_best));
    }

    #[test]
    fn p_best_all_sums_to_one() {
        let mut rng = rng();
        let p_best = PosteriorEngine::p_best_all(&mut rng, &[1, 1, 1], &[1, 1, 1], 10_000);
        assert_eq!(p_best.len(), 3);
        let total: Probability = p_best.iter().sum();
        assert!((total - 1.0).abs() < 5e-3, "p_best sums to {total}");
    }

    #[test]
    fn p_best_all_favors_the_stronger_arm() {
        let mut rng = rng();
        // arm 1 has seen far more successes than arm 0.
        let p_best = PosteriorEngine::p_best_all(&mut rng, &[5, 100], &[95, 10], 10_000);
        assert!(p_best[1] > 0.99, "p_best={:?}", p_best);
    }

    #[test]
    fn uniform_prior_gives_roughly_uniform_p_best() {
        let mut rng = rng();
        let p_best = PosteriorEngine::p_best_all(&mut rng, &[1, 1, 1], &[1, 1, 1], 10_000);
        for p in p_best {
            assert!((p - 1.0 / 3.0).abs() < 2e-2, "p={p}");
        }
    }

    #[test]
    fn ties_break_to_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.2]), 0);
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), 1);
    }
}

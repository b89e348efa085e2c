//! Colon-delimited key layout. Kept in one place so the interleaved
//! multi-get order used by `read_posteriors` stays in lock-step with `seed`.

pub fn n_arms(experiment_id: &str) -> String {
    format!("experiment:{experiment_id}:n_arms")
}

pub fn total_draws(experiment_id: &str) -> String {
    format!("experiment:{experiment_id}:total_draws")
}

pub fn alpha(experiment_id: &str, arm_id: usize) -> String {
    format!("experiment:{experiment_id}:arm:{arm_id}:alpha")
}

pub fn beta(experiment_id: &str, arm_id: usize) -> String {
    format!("experiment:{experiment_id}:arm:{arm_id}:beta")
}

/// The fixed interleaved key order `read_posteriors` fetches in a single
/// multi-get: alpha_0, beta_0, alpha_1, beta_1, ...
pub fn interleaved(experiment_id: &str, n_arms: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(2 * n_arms);
    for k in 0..n_arms {
        keys.push(alpha(experiment_id, k));
        keys.push(beta(experiment_id, k));
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_colon_delimited_and_namespaced() {
        assert_eq!(n_arms("exp-a"), "experiment:exp-a:n_arms");
        assert_eq!(total_draws("exp-a"), "experiment:exp-a:total_draws");
        assert_eq!(alpha("exp-a", 2), "experiment:exp-a:arm:2:alpha");
        assert_eq!(beta("exp-a", 2), "experiment:exp-a:arm:2:beta");
    }

    #[test]
    fn interleaved_order_is_alpha_beta_pairs_in_arm_order() {
        let keys = interleaved("exp-a", 3);
        assert_eq!(
            keys,
            vec![
                "experiment:exp-a:arm:0:alpha",
                "experiment:exp-a:arm:0:beta",
                "experiment:exp-a:arm:1:alpha",
                "experiment:exp-a:arm:1:beta",
                "experiment:exp-a:arm:2:alpha",
                "experiment:exp-a:arm:2:beta",
            ]
        );
    }
}

use crate::Match;

/// Unweighted mean net worth of the matched profiles.
///
/// Returns `None` when there is nothing to average; callers must treat that
/// as "no estimate", not as zero. Similarity scores do not weight the mean.
pub fn estimate(matches: &[Match<'_>]) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let total: f64 = matches.iter().map(|m| m.profile.net_worth).sum();
    Some(total / matches.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Profile, Vector};

    fn profiles(worths: &[f64]) -> Vec<Profile> {
        worths
            .iter()
            .enumerate()
            .map(|(i, w)| Profile::new(format!("p{}", i), *w, "", Vector::new(vec![1.0])))
            .collect()
    }

    #[test]
    fn test_empty_is_no_estimate() {
        assert_eq!(estimate(&[]), None);
    }

    #[test]
    fn test_mean_is_exact() {
        let profiles = profiles(&[1000.0, 3000.0]);
        let matches: Vec<Match> = profiles
            .iter()
            .map(|profile| Match { profile, score: 0.5 })
            .collect();
        assert_eq!(estimate(&matches), Some(2000.0));
    }

    #[test]
    fn test_scores_do_not_weight_the_mean() {
        let profiles = profiles(&[100.0, 200.0, 600.0]);
        let matches = vec![
            Match { profile: &profiles[0], score: 0.99 },
            Match { profile: &profiles[1], score: 0.01 },
            Match { profile: &profiles[2], score: -0.5 },
        ];
        assert_eq!(estimate(&matches), Some(300.0));
    }

    #[test]
    fn test_zero_worth_is_a_real_estimate() {
        let profiles = profiles(&[0.0]);
        let matches = vec![Match { profile: &profiles[0], score: 1.0 }];
        assert_eq!(estimate(&matches), Some(0.0));
    }
}

use crate::model::AccountSummary;

// Strict inequalities: accounts sitting exactly on a threshold are excluded.
const FOLLOWERS_BELOW: u64 = 3000;
const POSTS_ABOVE: u64 = 1000;
const FOLLOWING_ABOVE: u64 = 500;

/// Whether an account is worth expanding the frontier into: a small-audience
/// account that posts a lot and follows widely.
pub fn is_potential_target(summary: &AccountSummary) -> bool {
    summary.followers_count < FOLLOWERS_BELOW
        && summary.posts_count > POSTS_ABOVE
        && summary.following_count > FOLLOWING_ABOVE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountId;

    fn summary(followers: u64, following: u64, posts: u64) -> AccountSummary {
        AccountSummary {
            id: AccountId::from("x"),
            followers_count: followers,
            following_count: following,
            posts_count: posts,
        }
    }

    #[test]
    fn accepts_when_all_thresholds_hold() {
        assert!(is_potential_target(&summary(2999, 501, 1001)));
        assert!(is_potential_target(&summary(0, 10_000, 50_000)));
    }

    #[test]
    fn rejects_when_any_threshold_fails() {
        assert!(!is_potential_target(&summary(5000, 501, 1001)));
        assert!(!is_potential_target(&summary(2999, 100, 1001)));
        assert!(!is_potential_target(&summary(2999, 501, 50)));
    }

    #[test]
    fn boundary_values_are_excluded() {
        assert!(!is_potential_target(&summary(3000, 501, 1001)));
        assert!(!is_potential_target(&summary(2999, 500, 1001)));
        assert!(!is_potential_target(&summary(2999, 501, 1000)));
    }
}

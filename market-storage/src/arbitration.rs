//! Write-admission rules shared by the ticker and rate paths.
//!
//! Two rules run in order against the currently stored record:
//! 1. Priority: a candidate from a strictly less trusted provider loses,
//!    unless the stored record's provider is unranked.
//! 2. Staleness: a candidate older than the stored record loses when the
//!    stored rank is greater than or equal to the candidate's rank. This
//!    includes a stored record from a numerically weaker provider, so an
//!    older update never displaces a newer record from a less trusted source.

use market_core::{ProviderPriority, UNRANKED};

use crate::error::Rejection;

/// Decide whether a candidate may overwrite the stored record.
///
/// Ranks are looked up fresh on every call.
///
/// # Returns
/// `None` when the candidate is admitted, otherwise the rule it lost on
pub fn arbitrate<T, P>(
    existing_provider: &str,
    existing_timestamp: &T,
    candidate_provider: &str,
    candidate_timestamp: &T,
    priority: &P,
) -> Option<Rejection>
where
    T: PartialOrd,
    P: ProviderPriority + ?Sized,
{
    let existing_rank = priority.priority(existing_provider);
    let candidate_rank = priority.priority(candidate_provider);

    if existing_rank != UNRANKED && candidate_rank > existing_rank {
        return Some(Rejection::LowerPriority {
            existing_rank,
            candidate_rank,
        });
    }

    if existing_timestamp > candidate_timestamp && existing_rank >= candidate_rank {
        return Some(Rejection::Outdated);
    }

    None
}

/// Boolean form of [`arbitrate`]
pub fn should_reject<T, P>(
    existing_provider: &str,
    existing_timestamp: &T,
    candidate_provider: &str,
    candidate_timestamp: &T,
    priority: &P,
) -> bool
where
    T: PartialOrd,
    P: ProviderPriority + ?Sized,
{
    arbitrate(
        existing_provider,
        existing_timestamp,
        candidate_provider,
        candidate_timestamp,
        priority,
    )
    .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::ProviderList;

    fn ranks() -> impl Fn(&str) -> i32 {
        |provider: &str| match provider {
            "trusted" => 1,
            "peer" => 1,
            "weak" => 5,
            _ => UNRANKED,
        }
    }

    #[test]
    fn test_priority_dominance() {
        // Newer candidate from a weaker provider still loses
        let verdict = arbitrate("trusted", &100, "weak", &200, &ranks());
        assert_eq!(
            verdict,
            Some(Rejection::LowerPriority {
                existing_rank: 1,
                candidate_rank: 5
            })
        );
    }

    #[test]
    fn test_equal_rank_never_rejected_by_priority() {
        assert_eq!(arbitrate("trusted", &100, "peer", &200, &ranks()), None);
    }

    #[test]
    fn test_staleness_with_equal_rank() {
        assert_eq!(
            arbitrate("trusted", &200, "peer", &100, &ranks()),
            Some(Rejection::Outdated)
        );
        assert_eq!(arbitrate("trusted", &100, "peer", &200, &ranks()), None);
    }

    #[test]
    fn test_equal_timestamps_accepted() {
        assert_eq!(arbitrate("trusted", &100, "peer", &100, &ranks()), None);
    }

    #[test]
    fn test_older_candidate_loses_to_newer_weaker_record() {
        assert_eq!(
            arbitrate("weak", &500, "trusted", &100, &ranks()),
            Some(Rejection::Outdated)
        );
    }

    #[test]
    fn test_more_trusted_candidate_wins_when_not_older() {
        assert_eq!(arbitrate("weak", &500, "trusted", &500, &ranks()), None);
        assert_eq!(arbitrate("weak", &500, "trusted", &900, &ranks()), None);
    }

    #[test]
    fn test_unranked_existing_bypasses_priority() {
        // Any candidate rank passes the priority rule
        assert_eq!(arbitrate("mystery", &100, "weak", &200, &ranks()), None);
        assert_eq!(arbitrate("mystery", &100, "other", &200, &ranks()), None);
    }

    #[test]
    fn test_unranked_existing_still_subject_to_staleness() {
        // -1 >= -1: both unranked, older candidate is stale
        assert_eq!(
            arbitrate("mystery", &200, "other", &100, &ranks()),
            Some(Rejection::Outdated)
        );
        // -1 < 5: a ranked candidate is not blocked by a newer unranked record
        assert_eq!(arbitrate("mystery", &200, "weak", &100, &ranks()), None);
    }

    #[test]
    fn test_should_reject_with_provider_list() {
        let list = ProviderList::new(["binance", "coingecko"]);
        assert!(should_reject("binance", &1, "coingecko", &2, &list));
        assert!(should_reject("coingecko", &2, "binance", &1, &list));
        assert!(!should_reject("coingecko", &2, "binance", &3, &list));
    }
}

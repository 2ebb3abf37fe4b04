//! Page bounds and the offset/limit window applied to store results.
//!
//! Backends only understand a fetch size. [`PaginationSpec::store_limit`] decides how
//! many documents to ask for under a [`StoreLimitPolicy`], and
//! [`PaginationSpec::paginate`] cuts the requested window out of whatever came back.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Page size used when the request has no `limit`.
pub const DEFAULT_LIMIT: usize = 20;

/// Smallest accepted page size.
pub const MIN_LIMIT: usize = 1;

/// Largest accepted page size.
pub const MAX_LIMIT: usize = 1000;

/// Validated page bounds of a query.
///
/// Values coming from a request go through
/// [`parse_pagination`](crate::params::parse_pagination), which enforces
/// `1 <= limit <= 1000`.
///
/// # Example
///
/// ```ignore
/// use docgate_core::page::PaginationSpec;
///
/// let page = PaginationSpec::new(2, 1);
/// assert_eq!(page.paginate(vec!["a", "b", "c", "d"]), vec!["b", "c"]);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSpec {
    /// Maximum number of documents in the page.
    pub limit: usize,
    /// Number of leading documents to skip.
    pub offset: usize,
}

impl PaginationSpec {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// How many documents the store must be asked for.
    pub fn store_limit(&self, policy: StoreLimitPolicy) -> usize {
        match policy {
            StoreLimitPolicy::OffsetPlusLimit => self.offset.saturating_add(self.limit),
            StoreLimitPolicy::LimitOnly => self.limit,
        }
    }

    /// Keeps at most `limit` items starting at `offset`.
    ///
    /// An offset at or past the end yields an empty page.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

impl Default for PaginationSpec {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, offset: 0 }
    }
}

/// How the store-side fetch size relates to the client's page bounds.
///
/// The store never skips documents itself; the adapter slices `[offset, offset + limit)`
/// out of the fetched documents in both modes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreLimitPolicy {
    /// Fetch `offset + limit` documents so the window is always complete.
    #[default]
    OffsetPlusLimit,
    /// Fetch only `limit` documents. Any nonzero offset then eats into the page,
    /// returning fewer documents than exist.
    LimitOnly,
}

impl fmt::Display for StoreLimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreLimitPolicy::OffsetPlusLimit => "offset-plus-limit",
            StoreLimitPolicy::LimitOnly => "limit-only",
        })
    }
}

impl FromStr for StoreLimitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offset-plus-limit" => Ok(StoreLimitPolicy::OffsetPlusLimit),
            "limit-only" => Ok(StoreLimitPolicy::LimitOnly),
            other => Err(format!(
                "unknown store limit policy `{other}`, expected `offset-plus-limit` or `limit-only`"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_twenty_from_the_start() {
        assert_eq!(PaginationSpec::default(), PaginationSpec::new(20, 0));
    }

    #[test]
    fn paginate_cuts_the_window() {
        let page = PaginationSpec::new(2, 1);
        assert_eq!(page.paginate(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = PaginationSpec::new(5, 10);
        assert!(page.paginate(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn store_limit_follows_policy() {
        let page = PaginationSpec::new(2, 1);
        assert_eq!(page.store_limit(StoreLimitPolicy::OffsetPlusLimit), 3);
        assert_eq!(page.store_limit(StoreLimitPolicy::LimitOnly), 2);

        let huge = PaginationSpec::new(1000, usize::MAX);
        assert_eq!(huge.store_limit(StoreLimitPolicy::OffsetPlusLimit), usize::MAX);
    }

    #[test]
    fn policy_round_trips_through_its_name() {
        for policy in [StoreLimitPolicy::OffsetPlusLimit, StoreLimitPolicy::LimitOnly] {
            assert_eq!(policy.to_string().parse::<StoreLimitPolicy>(), Ok(policy));
        }
        assert!("everything".parse::<StoreLimitPolicy>().is_err());
    }
}

//! Freshness clock: derives a display status from timestamps.
//!
//! Everything here is a pure, total function. Expiry is a *status*, never a
//! removal trigger; nothing in this module mutates an item.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i128 = 86_400;

/// Expiration policy of an item once it has been opened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum ShelfLife {
    /// Good for this many days after opening.
    Days(u32),
    /// Never expires (salt, honey, dish soap).
    Never,
}

impl ShelfLife {
    pub fn days(self) -> Option<u32> {
        match self {
            ShelfLife::Days(days) => Some(days),
            ShelfLife::Never => None,
        }
    }
}

/// Freshness of an item, ordered by severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    NotOpen,
    Fresh,
    Nearing,
    Urgent,
    Expired,
}

impl FreshnessStatus {
    /// Text of the open tag.
    pub fn label(self) -> &'static str {
        match self {
            FreshnessStatus::NotOpen => "sealed",
            FreshnessStatus::Fresh => "fresh",
            FreshnessStatus::Nearing => "use soon",
            FreshnessStatus::Urgent => "use now",
            FreshnessStatus::Expired => "expired",
        }
    }

    /// Color of the open tag.
    pub fn color(self) -> &'static str {
        match self {
            FreshnessStatus::NotOpen => "#9e9e9e",
            FreshnessStatus::Fresh => "#43a047",
            FreshnessStatus::Nearing => "#fdd835",
            FreshnessStatus::Urgent => "#fb8c00",
            FreshnessStatus::Expired => "#e53935",
        }
    }
}

/// Anything that carries the inputs of the freshness clock.
pub trait Perishable {
    fn opened_at(&self) -> Option<DateTime<Utc>>;
    fn shelf_life(&self) -> ShelfLife;
}

/// Derive the freshness status of an item.
///
/// Progress is elapsed time since opening divided by the shelf life:
/// `>= 1` expired, `>= 2/3` urgent, `>= 1/3` nearing, otherwise fresh.
/// Opened-in-the-future and zero-day shelf lives clamp to `Fresh`.
pub fn freshness_status(
    opened_at: Option<DateTime<Utc>>,
    shelf_life: ShelfLife,
    now: DateTime<Utc>,
) -> FreshnessStatus {
    let Some(opened_at) = opened_at else {
        return FreshnessStatus::NotOpen;
    };
    let ShelfLife::Days(days) = shelf_life else {
        return FreshnessStatus::Fresh;
    };
    if days == 0 {
        return FreshnessStatus::Fresh;
    }

    let elapsed = i128::from(now.signed_duration_since(opened_at).num_seconds());
    if elapsed < 0 {
        return FreshnessStatus::Fresh;
    }

    // Integer thirds keep the thresholds exact (3 of 9 days is exactly 1/3).
    let lifetime = i128::from(days) * SECONDS_PER_DAY;
    if elapsed >= lifetime {
        FreshnessStatus::Expired
    } else if elapsed * 3 >= lifetime * 2 {
        FreshnessStatus::Urgent
    } else if elapsed * 3 >= lifetime {
        FreshnessStatus::Nearing
    } else {
        FreshnessStatus::Fresh
    }
}

/// Absolute expiry instant, for display.
///
/// `None` when unopened, never-expiring, or out of the representable range.
pub fn expiration_date(opened_at: Option<DateTime<Utc>>, shelf_life: ShelfLife) -> Option<DateTime<Utc>> {
    let opened_at = opened_at?;
    let days = shelf_life.days()?;
    opened_at.checked_add_signed(Duration::days(i64::from(days)))
}

/// Whole days left until expiry (negative once expired).
pub fn days_until_expiration(
    opened_at: Option<DateTime<Utc>>,
    shelf_life: ShelfLife,
    now: DateTime<Utc>,
) -> Option<i64> {
    expiration_date(opened_at, shelf_life).map(|expiry| expiry.signed_duration_since(now).num_days())
}

/// Items whose computed expiry is at or before `now + window_days`, soonest first.
///
/// Already-expired items are included; unopened and never-expiring items are not.
pub fn expiring_within<'a, T, I>(items: I, window_days: u32, now: DateTime<Utc>) -> Vec<&'a T>
where
    T: Perishable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    // Windows past the calendar's end admit every finite expiry.
    let horizon = now
        .checked_add_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut due: Vec<(DateTime<Utc>, &'a T)> = items
        .into_iter()
        .filter_map(|item| {
            expiration_date(item.opened_at(), item.shelf_life())
                .filter(|expiry| *expiry <= horizon)
                .map(|expiry| (expiry, item))
        })
        .collect();

    due.sort_by_key(|(expiry, _)| *expiry);
    due.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    struct Jar {
        label: &'static str,
        opened_at: Option<DateTime<Utc>>,
        shelf_life: ShelfLife,
    }

    impl Perishable for Jar {
        fn opened_at(&self) -> Option<DateTime<Utc>> {
            self.opened_at
        }

        fn shelf_life(&self) -> ShelfLife {
            self.shelf_life
        }
    }

    #[test]
    fn unopened_items_are_not_open() {
        assert_eq!(
            freshness_status(None, ShelfLife::Days(5), noon()),
            FreshnessStatus::NotOpen
        );
        assert_eq!(freshness_status(None, ShelfLife::Never, noon()), FreshnessStatus::NotOpen);
    }

    #[test]
    fn never_expiring_items_stay_fresh() {
        let opened = noon() - Duration::days(3650);
        assert_eq!(
            freshness_status(Some(opened), ShelfLife::Never, noon()),
            FreshnessStatus::Fresh
        );
    }

    #[test]
    fn nine_day_item_opened_four_days_ago_is_nearing() {
        let opened = noon() - Duration::days(4);
        assert_eq!(
            freshness_status(Some(opened), ShelfLife::Days(9), noon()),
            FreshnessStatus::Nearing
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        let life = ShelfLife::Days(9);
        let at = |days: i64| freshness_status(Some(noon() - Duration::days(days)), life, noon());

        assert_eq!(at(0), FreshnessStatus::Fresh);
        assert_eq!(at(2), FreshnessStatus::Fresh);
        assert_eq!(at(3), FreshnessStatus::Nearing);
        assert_eq!(at(6), FreshnessStatus::Urgent);
        assert_eq!(at(9), FreshnessStatus::Expired);
        assert_eq!(at(40), FreshnessStatus::Expired);
    }

    #[test]
    fn garbage_inputs_clamp_to_fresh() {
        let future = noon() + Duration::days(2);
        assert_eq!(
            freshness_status(Some(future), ShelfLife::Days(3), noon()),
            FreshnessStatus::Fresh
        );
        assert_eq!(
            freshness_status(Some(noon() - Duration::days(10)), ShelfLife::Days(0), noon()),
            FreshnessStatus::Fresh
        );
    }

    #[test]
    fn expiration_date_adds_shelf_life_to_opening() {
        let opened = noon() - Duration::days(1);
        assert_eq!(
            expiration_date(Some(opened), ShelfLife::Days(5)),
            Some(opened + Duration::days(5))
        );
        assert_eq!(expiration_date(Some(opened), ShelfLife::Never), None);
        assert_eq!(expiration_date(None, ShelfLife::Days(5)), None);
        assert_eq!(days_until_expiration(Some(opened), ShelfLife::Days(5), noon()), Some(4));
    }

    #[test]
    fn expiring_within_filters_and_orders_by_expiry() {
        let jars = vec![
            Jar { label: "salsa", opened_at: Some(noon() - Duration::days(6)), shelf_life: ShelfLife::Days(7) },
            Jar { label: "pickles", opened_at: Some(noon()), shelf_life: ShelfLife::Days(60) },
            Jar { label: "milk", opened_at: Some(noon() - Duration::days(8)), shelf_life: ShelfLife::Days(7) },
            Jar { label: "honey", opened_at: Some(noon() - Duration::days(300)), shelf_life: ShelfLife::Never },
            Jar { label: "sealed", opened_at: None, shelf_life: ShelfLife::Days(1) },
        ];

        let due: Vec<&str> = expiring_within(&jars, 3, noon()).into_iter().map(|j| j.label).collect();
        assert_eq!(due, vec!["milk", "salsa"]);
    }

    #[test]
    fn huge_windows_include_every_opened_finite_item() {
        let jars = vec![
            Jar { label: "jam", opened_at: Some(noon()), shelf_life: ShelfLife::Days(3) },
            Jar { label: "salt", opened_at: Some(noon()), shelf_life: ShelfLife::Never },
        ];

        let due: Vec<&str> = expiring_within(&jars, u32::MAX, noon()).into_iter().map(|j| j.label).collect();
        assert_eq!(due, vec!["jam"]);
    }

    #[test]
    fn severity_order_matches_declaration() {
        assert!(FreshnessStatus::Fresh < FreshnessStatus::Nearing);
        assert!(FreshnessStatus::Nearing < FreshnessStatus::Urgent);
        assert!(FreshnessStatus::Urgent < FreshnessStatus::Expired);
        assert_eq!(FreshnessStatus::Expired.label(), "expired");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: identical inputs always yield identical output.
            #[test]
            fn status_is_deterministic(
                opened_offset in -100_000i64..10_000_000,
                days in 0u32..400,
            ) {
                let opened = noon() - Duration::seconds(opened_offset);
                let a = freshness_status(Some(opened), ShelfLife::Days(days), noon());
                let b = freshness_status(Some(opened), ShelfLife::Days(days), noon());
                prop_assert_eq!(a, b);
            }

            /// Property: severity never decreases as time advances.
            #[test]
            fn status_is_monotonic_in_time(
                days in 1u32..365,
                first in 0i64..40_000_000,
                step in 0i64..40_000_000,
            ) {
                let opened = noon();
                let earlier = opened + Duration::seconds(first);
                let later = earlier + Duration::seconds(step);

                let before = freshness_status(Some(opened), ShelfLife::Days(days), earlier);
                let after = freshness_status(Some(opened), ShelfLife::Days(days), later);
                prop_assert!(before <= after);
                prop_assert!(before >= FreshnessStatus::Fresh);
            }

            /// Property: never-expiring items are fresh for any elapsed time.
            #[test]
            fn never_is_always_fresh(elapsed in 0i64..i64::from(u32::MAX)) {
                let opened = noon() - Duration::seconds(elapsed);
                prop_assert_eq!(
                    freshness_status(Some(opened), ShelfLife::Never, noon()),
                    FreshnessStatus::Fresh
                );
            }
        }
    }
}

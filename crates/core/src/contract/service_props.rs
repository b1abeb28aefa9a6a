//! Property-based tests for contract scheduling and renewal.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::service::ContractService;
use super::types::{ContractStatus, ServiceFrequency, VisitStatus};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2033, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn frequency() -> impl Strategy<Value = ServiceFrequency> {
    prop_oneof![
        Just(ServiceFrequency::Monthly),
        Just(ServiceFrequency::Quarterly),
        Just(ServiceFrequency::HalfYearly),
        Just(ServiceFrequency::Yearly),
    ]
}

/// A contract period of 1 to 36 whole months.
fn period() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (any_date(), 1u32..=36).prop_map(|(start, months)| {
        let end = start
            .checked_add_months(chrono::Months::new(months))
            .unwrap();
        (start, end)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every generated visit falls strictly after the start date, no
    /// later than the end date, in strictly increasing order, and
    /// starts Pending.
    #[test]
    fn prop_schedule_within_period_and_ordered(
        (start, end) in period(),
        freq in frequency(),
    ) {
        let visits = ContractService::build_schedule(start, end, freq);
        for visit in &visits {
            prop_assert!(visit.due_date > start);
            prop_assert!(visit.due_date <= end);
            prop_assert_eq!(visit.status, VisitStatus::Pending);
        }
        for pair in visits.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    /// The number of visits never exceeds the period length divided by
    /// the interval, and a period of at least one interval always
    /// yields at least one visit.
    #[test]
    fn prop_schedule_density((start, end) in period(), freq in frequency()) {
        let visits = ContractService::build_schedule(start, end, freq);
        let interval = freq.interval_months();
        let one_interval_in = start.checked_add_months(chrono::Months::new(interval)).unwrap();
        if one_interval_in <= end {
            prop_assert!(!visits.is_empty());
        }
        // 36 months / 1 month interval bounds the schedule length.
        prop_assert!(visits.len() <= (36 / interval) as usize);
    }

    /// Projection is idempotent and only ever maps Active to Expired.
    #[test]
    fn prop_effective_status_idempotent(
        stored in prop_oneof![
            Just(ContractStatus::Draft),
            Just(ContractStatus::Active),
            Just(ContractStatus::Renewed),
        ],
        end in any_date(),
        as_of in any_date(),
    ) {
        let once = ContractService::effective_status(stored, end, as_of);
        let twice = ContractService::effective_status(once, end, as_of);
        prop_assert_eq!(once, twice);
        if once == ContractStatus::Expired {
            prop_assert_eq!(stored, ContractStatus::Active);
            prop_assert!(as_of > end);
        }
    }
}

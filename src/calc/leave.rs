use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inclusive whole-day span: (end - start) in days + 1.
/// start=2024-01-01, end=2024-01-03 counts 3 days.
pub fn number_of_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Sums leave days per type. Callers pass only the leaves that qualify for
/// the balance (Approved or Pending, starting within the calendar year).
pub fn balance_by_type<I>(leaves: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = (String, i32)>,
{
    let mut balance: BTreeMap<String, i64> = BTreeMap::new();
    for (leave_type, days) in leaves {
        *balance.entry(leave_type).or_insert(0) += days as i64;
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn span_is_inclusive() {
        assert_eq!(number_of_days(d(2024, 1, 1), d(2024, 1, 3)), 3);
        assert_eq!(number_of_days(d(2024, 1, 1), d(2024, 1, 1)), 1);
    }

    #[test]
    fn span_crosses_month_and_year_boundaries() {
        assert_eq!(number_of_days(d(2024, 1, 30), d(2024, 2, 2)), 4);
        assert_eq!(number_of_days(d(2024, 12, 30), d(2025, 1, 2)), 4);
    }

    #[test]
    fn balance_sums_per_type() {
        let balance = balance_by_type(vec![
            ("Sick Leave".to_string(), 2),
            ("Annual Leave".to_string(), 5),
            ("Sick Leave".to_string(), 1),
        ]);
        assert_eq!(balance.get("Sick Leave"), Some(&3));
        assert_eq!(balance.get("Annual Leave"), Some(&5));
        assert_eq!(balance.get("Casual Leave"), None);
    }
}

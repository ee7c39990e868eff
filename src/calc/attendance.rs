use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::round2;
use crate::model::attendance::AttendanceStatus;

/// (check_out - check_in) in hours, rounded to 2 decimal places.
/// Millisecond precision so sub-minute stamps still count.
pub fn work_hours(check_in: NaiveDateTime, check_out: NaiveDateTime) -> f64 {
    let ms = (check_out - check_in).num_milliseconds();
    round2(ms as f64 / 3_600_000.0)
}

/// The slice of an attendance row the report aggregation needs.
pub struct DayRecord {
    pub employee_id: u64,
    pub status: Option<AttendanceStatus>,
    pub is_late: bool,
    pub work_hours: f64,
    pub overtime_minutes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeAttendanceSummary {
    pub employee_id: u64,
    pub employee_name: String,
    pub department: String,
    pub total_present: u32,
    pub total_absent: u32,
    pub total_late: u32,
    pub total_work_hours: f64,
    pub total_overtime_minutes: i64,
}

/// Groups a date-range of attendance rows by employee and tallies each
/// employee's presence counts and hour sums. Employees with no rows in the
/// range do not appear; rows whose employee is missing from `names` are
/// skipped (deleted employee).
pub fn summarize_by_employee(
    records: &[DayRecord],
    names: &HashMap<u64, (String, String)>,
) -> Vec<EmployeeAttendanceSummary> {
    let mut grouped: HashMap<u64, Vec<&DayRecord>> = HashMap::new();
    for r in records {
        grouped.entry(r.employee_id).or_default().push(r);
    }

    let mut report: Vec<EmployeeAttendanceSummary> = grouped
        .into_iter()
        .filter_map(|(employee_id, rows)| {
            let (name, department) = names.get(&employee_id)?;
            Some(EmployeeAttendanceSummary {
                employee_id,
                employee_name: name.clone(),
                department: department.clone(),
                total_present: rows
                    .iter()
                    .filter(|r| r.status == Some(AttendanceStatus::Present))
                    .count() as u32,
                total_absent: rows
                    .iter()
                    .filter(|r| r.status == Some(AttendanceStatus::Absent))
                    .count() as u32,
                total_late: rows.iter().filter(|r| r.is_late).count() as u32,
                total_work_hours: round2(rows.iter().map(|r| r.work_hours).sum()),
                total_overtime_minutes: rows.iter().map(|r| r.overtime_minutes).sum(),
            })
        })
        .collect();

    report.sort_by_key(|s| s.employee_id);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn work_hours_rounds_to_two_decimals() {
        assert_eq!(work_hours(at(9, 0, 0), at(17, 30, 0)), 8.5);
        // 8h 15m 30s = 8.2583.. -> 8.26
        assert_eq!(work_hours(at(9, 0, 0), at(17, 15, 30)), 8.26);
        assert_eq!(work_hours(at(9, 0, 0), at(9, 0, 0)), 0.0);
    }

    #[test]
    fn work_hours_matches_millisecond_formula() {
        let t1 = at(8, 47, 13);
        let t2 = at(18, 2, 41);
        let expected = {
            let ms = (t2 - t1).num_milliseconds() as f64;
            (ms / 3_600_000.0 * 100.0).round() / 100.0
        };
        assert_eq!(work_hours(t1, t2), expected);
    }

    #[test]
    fn summary_groups_and_counts_by_employee() {
        let records = vec![
            DayRecord {
                employee_id: 1,
                status: Some(AttendanceStatus::Present),
                is_late: false,
                work_hours: 8.0,
                overtime_minutes: 30,
            },
            DayRecord {
                employee_id: 1,
                status: Some(AttendanceStatus::Present),
                is_late: true,
                work_hours: 7.5,
                overtime_minutes: 0,
            },
            DayRecord {
                employee_id: 1,
                status: Some(AttendanceStatus::Absent),
                is_late: false,
                work_hours: 0.0,
                overtime_minutes: 0,
            },
            DayRecord {
                employee_id: 2,
                status: Some(AttendanceStatus::Present),
                is_late: false,
                work_hours: 9.0,
                overtime_minutes: 60,
            },
        ];
        let mut names = HashMap::new();
        names.insert(1, ("John Doe".to_string(), "Engineering".to_string()));
        names.insert(2, ("Jane Roe".to_string(), "Finance".to_string()));

        let report = summarize_by_employee(&records, &names);
        assert_eq!(report.len(), 2);

        let john = &report[0];
        assert_eq!(john.employee_id, 1);
        assert_eq!(john.total_present, 2);
        assert_eq!(john.total_absent, 1);
        assert_eq!(john.total_late, 1);
        assert_eq!(john.total_work_hours, 15.5);
        assert_eq!(john.total_overtime_minutes, 30);

        assert_eq!(report[1].total_work_hours, 9.0);
    }

    #[test]
    fn summary_skips_unknown_employees() {
        let records = vec![DayRecord {
            employee_id: 99,
            status: Some(AttendanceStatus::Present),
            is_late: false,
            work_hours: 8.0,
            overtime_minutes: 0,
        }];
        assert!(summarize_by_employee(&records, &HashMap::new()).is_empty());
    }
}

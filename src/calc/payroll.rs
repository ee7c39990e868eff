use chrono::NaiveDate;

use crate::model::attendance::AttendanceStatus;
use crate::model::employee::MoneyMap;

/// Calendar days in the month; this is the working-day basis for the
/// derived hourly rate.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid month")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("valid month")
    };
    (next - first).num_days() as u32
}

/// First and last calendar day of the month, for the attendance query span.
pub fn month_span(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).expect("valid day");
    (first, last)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AttendanceCounts {
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub overtime_minutes: i64,
}

/// Tallies one month of attendance rows by status. `(status, overtime)`
/// pairs come straight off the fetched rows; unparseable status strings
/// count toward nothing.
pub fn count_attendance<I>(rows: I) -> AttendanceCounts
where
    I: IntoIterator<Item = (Option<AttendanceStatus>, i64)>,
{
    let mut counts = AttendanceCounts::default();
    for (status, overtime_minutes) in rows {
        match status {
            Some(AttendanceStatus::Present) => counts.present_days += 1,
            Some(AttendanceStatus::Absent) => counts.absent_days += 1,
            Some(AttendanceStatus::OnLeave) => counts.leave_days += 1,
            _ => {}
        }
        counts.overtime_minutes += overtime_minutes;
    }
    counts
}

#[derive(Debug, PartialEq)]
pub struct Payslip {
    pub working_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub overtime_hours: f64,
    pub overtime_pay: f64,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
}

/// The payslip derivation:
///   overtime_hours = Σminutes / 60
///   overtime_pay   = basic / (working_days × 8) × overtime_hours × 1.5
///   gross          = basic + Σallowances + overtime_pay
///   net            = gross - Σdeductions
/// Net is computed from gross and the deduction sum directly, so the
/// gross - deductions = net identity holds exactly.
pub fn compute_payslip(
    basic_salary: f64,
    allowances: &MoneyMap,
    deductions: &MoneyMap,
    working_days: u32,
    counts: &AttendanceCounts,
) -> Payslip {
    let overtime_hours = counts.overtime_minutes as f64 / 60.0;
    let hourly_rate = basic_salary / (working_days as f64 * 8.0);
    let overtime_pay = hourly_rate * overtime_hours * 1.5;

    let total_allowances: f64 = allowances.values().sum();
    let total_deductions: f64 = deductions.values().sum();

    let gross_salary = basic_salary + total_allowances + overtime_pay;
    let net_salary = gross_salary - total_deductions;

    Payslip {
        working_days,
        present_days: counts.present_days,
        absent_days: counts.absent_days,
        leave_days: counts.leave_days,
        overtime_hours,
        overtime_pay,
        gross_salary,
        total_deductions,
        net_salary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(pairs: &[(&str, f64)]) -> MoneyMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn month_span_covers_whole_month() {
        let (first, last) = month_span(2026, 2);
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn counts_filter_by_status() {
        let counts = count_attendance(vec![
            (Some(AttendanceStatus::Present), 0),
            (Some(AttendanceStatus::Present), 90),
            (Some(AttendanceStatus::Absent), 0),
            (Some(AttendanceStatus::OnLeave), 0),
            (Some(AttendanceStatus::Late), 30),
            (None, 15),
        ]);
        assert_eq!(counts.present_days, 2);
        assert_eq!(counts.absent_days, 1);
        assert_eq!(counts.leave_days, 1);
        assert_eq!(counts.overtime_minutes, 135);
    }

    #[test]
    fn payslip_without_overtime() {
        // basic 3000, allowances {hra:500, transport:200}, deductions {tax:300}
        let slip = compute_payslip(
            3000.0,
            &money(&[("hra", 500.0), ("transport", 200.0)]),
            &money(&[("tax", 300.0)]),
            22,
            &AttendanceCounts {
                present_days: 22,
                ..Default::default()
            },
        );
        assert_eq!(slip.gross_salary, 3700.0);
        assert_eq!(slip.total_deductions, 300.0);
        assert_eq!(slip.net_salary, 3400.0);
        assert_eq!(slip.overtime_pay, 0.0);
        assert_eq!(slip.working_days, 22);
        assert_eq!(slip.present_days, 22);
    }

    #[test]
    fn overtime_paid_at_time_and_a_half() {
        // 30 working days, basic 2400 -> hourly rate 10; 6 overtime hours
        let slip = compute_payslip(
            2400.0,
            &MoneyMap::new(),
            &MoneyMap::new(),
            30,
            &AttendanceCounts {
                present_days: 30,
                overtime_minutes: 360,
                ..Default::default()
            },
        );
        assert_eq!(slip.overtime_hours, 6.0);
        assert_eq!(slip.overtime_pay, 90.0);
        assert_eq!(slip.gross_salary, 2490.0);
        assert_eq!(slip.net_salary, 2490.0);
    }

    #[test]
    fn gross_minus_deductions_is_net_exactly() {
        let slip = compute_payslip(
            3333.33,
            &money(&[("hra", 123.45), ("meal", 67.89)]),
            &money(&[("tax", 456.78), ("pension", 12.34)]),
            28,
            &AttendanceCounts {
                present_days: 20,
                absent_days: 2,
                leave_days: 1,
                overtime_minutes: 125,
            },
        );
        assert_eq!(slip.net_salary, slip.gross_salary - slip.total_deductions);
    }
}

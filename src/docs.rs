use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::attendance::CheckInOut;
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::leave::{CreateLeave, DecideLeave};
use crate::api::payroll::{CalculatePayroll, GenerateOutcome, GeneratePayrolls, UpdatePayroll};
use crate::api::performance::{AcknowledgeEvaluation, CreateEvaluation, UpdateEvaluation};
use crate::api::recruitment::{
    ApplyToJob, CreateJob, ScheduleInterview, UpdateApplication, UpdateJob,
};
use crate::auth::handlers::MeResponse;
use crate::calc::attendance::EmployeeAttendanceSummary;
use crate::calc::performance::{PerformanceAnalytics, RatingPoint};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{Leave, LeaveStatus, LeaveType};
use crate::model::payroll::{Payroll, PayrollStatus};
use crate::model::performance::{Criterion, Goal, PerformanceReview, ReviewStatus};
use crate::model::recruitment::{
    Applicant, Application, ApplicationNote, Interview, JobPosting, JobStatus,
};
use crate::models::{ChangePasswordReq, LoginReqDto, RegisterReq};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

Core HR operations behind one REST API:

- **Employees** - profiles with compensation structure (basic salary plus named allowance/deduction components)
- **Attendance** - daily check-in/check-out with derived work hours, range reports per employee
- **Leave** - applications, approval workflow, yearly per-type balances
- **Payroll** - payslip calculation from attendance and compensation, bulk monthly generation
- **Performance** - evaluations with criteria ratings, acknowledgement flow, rating analytics
- **Recruitment** - job postings and an application pipeline

Most endpoints require **JWT Bearer authentication**; mutating HR operations
are limited to Admin/HR (and Manager where noted).
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::me,
        crate::auth::handlers::change_password,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::list_for_employee,
        crate::api::attendance::report,

        crate::api::leave::create_leave,
        crate::api::leave::list_for_employee,
        crate::api::leave::pending,
        crate::api::leave::get_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::cancel_leave,
        crate::api::leave::balance,

        crate::api::payroll::calculate,
        crate::api::payroll::generate,
        crate::api::payroll::list_for_employee,
        crate::api::payroll::monthly,
        crate::api::payroll::update_payroll,

        crate::api::performance::create_evaluation,
        crate::api::performance::list_for_employee,
        crate::api::performance::pending,
        crate::api::performance::get_evaluation,
        crate::api::performance::update_evaluation,
        crate::api::performance::acknowledge,
        crate::api::performance::analytics,

        crate::api::recruitment::create_job,
        crate::api::recruitment::list_jobs,
        crate::api::recruitment::get_job,
        crate::api::recruitment::update_job,
        crate::api::recruitment::apply,
        crate::api::recruitment::list_applications,
        crate::api::recruitment::update_application,
        crate::api::recruitment::schedule_interview,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            ChangePasswordReq,
            MeResponse,

            Employee,
            EmployeeStatus,
            CreateEmployee,
            UpdateEmployee,

            Attendance,
            AttendanceStatus,
            CheckInOut,
            EmployeeAttendanceSummary,

            Leave,
            LeaveType,
            LeaveStatus,
            CreateLeave,
            DecideLeave,

            Payroll,
            PayrollStatus,
            CalculatePayroll,
            GeneratePayrolls,
            GenerateOutcome,
            UpdatePayroll,

            PerformanceReview,
            ReviewStatus,
            Criterion,
            Goal,
            CreateEvaluation,
            UpdateEvaluation,
            AcknowledgeEvaluation,
            RatingPoint,
            PerformanceAnalytics,

            JobPosting,
            JobStatus,
            Applicant,
            Application,
            ApplicationNote,
            Interview,
            CreateJob,
            UpdateJob,
            ApplyToJob,
            UpdateApplication,
            ScheduleInterview,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
        (name = "Performance", description = "Performance review APIs"),
        (name = "Recruitment", description = "Recruitment pipeline APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

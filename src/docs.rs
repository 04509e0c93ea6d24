use crate::api::admin::{AdminListResponse, AdminQuery, UpdateAdmin};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, EmployeeWithLeaves, UpdateEmployee,
};
use crate::api::leave::{
    CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse, UpdateLeave,
};
use crate::leave_policy::LeaveDenial;
use crate::model::admin::Admin;
use crate::model::employee::Employee;
use crate::model::gender::Gender;
use crate::model::leave::Leave;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Leave Management API",
        version = "1.0.0",
        description = r#"
## Employee Leave Management

This API powers an admin dashboard for managing employees and their leave
requests.

### Key Features
- **Admin Management**
  - Register, list, update and delete admin operators
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Leave Management**
  - Create and edit leave requests against the eligibility rules
    (maximum 12 days per year, 1 day per month, single-day requests)

### Security
Protected endpoints use **JWT Bearer authentication**; only admins operate
the dashboard.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Leave rejections carry a distinct reason code
  (`InvalidDateRange`, `SpanTooLong`, `YearlyLimitExceeded`,
  `MonthlyLimitExceeded`)

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::update_leave,
        crate::api::leave::delete_leave,
        crate::api::leave::leaves_by_employee,
        crate::api::leave::employees_with_leaves,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::employee_leaves,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::admin::list_admins,
        crate::api::admin::get_admin,
        crate::api::admin::update_admin,
        crate::api::admin::update_profile,
        crate::api::admin::delete_admin,
    ),
    components(
        schemas(
            Admin,
            AdminQuery,
            AdminListResponse,
            UpdateAdmin,
            Employee,
            EmployeeQuery,
            EmployeeListResponse,
            EmployeeWithLeaves,
            CreateEmployee,
            UpdateEmployee,
            Leave,
            LeaveDenial,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            CreateLeave,
            UpdateLeave,
            Gender
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Admin", description = "Admin management APIs"),
    )
)]
pub struct ApiDoc;

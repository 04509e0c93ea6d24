use crate::{
    api::employee::EmployeeWithLeaves,
    leave_policy::{self, LeaveDenial, LeaveSpan},
    model::{employee::Employee, leave::Leave},
    utils::db_utils::{SqlValue, build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{MySqlPool, prelude::FromRow};
use std::collections::HashMap;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[schema(example = 1)]
    pub employee_id: Option<u64>,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Family event")]
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 1)]
    pub employee_id: Option<u64>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

/// A leave row joined with a summary of its employee.
#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-03-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
    #[schema(example = "John")]
    pub employee_first_name: String,
    #[schema(example = "Doe")]
    pub employee_last_name: String,
    #[schema(example = "john.doe@example.com")]
    pub employee_email: String,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

const LEAVE_WITH_EMPLOYEE: &str = r#"
    SELECT
        l.id, l.employee_id, l.start_date, l.end_date, l.reason,
        l.created_at, l.updated_at,
        e.first_name AS employee_first_name,
        e.last_name AS employee_last_name,
        e.email AS employee_email
    FROM leaves l
    JOIN employees e ON e.id = l.employee_id
"#;

fn denial_response(denial: LeaveDenial) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": denial.code(),
        "message": denial.to_string()
    }))
}

async fn employee_exists(pool: &MySqlPool, employee_id: u64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ? LIMIT 1)")
        .bind(employee_id)
        .fetch_one(pool)
        .await
}

/// The employee's other leave spans, with the record being edited excluded
/// so an update never counts against itself.
async fn other_leave_spans(
    pool: &MySqlPool,
    employee_id: u64,
    exclude_leave_id: Option<u64>,
) -> Result<Vec<LeaveSpan>, sqlx::Error> {
    let rows: Vec<(NaiveDate, NaiveDate)> = match exclude_leave_id {
        Some(leave_id) => {
            sqlx::query_as(
                "SELECT start_date, end_date FROM leaves WHERE employee_id = ? AND id <> ?",
            )
            .bind(employee_id)
            .bind(leave_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as("SELECT start_date, end_date FROM leaves WHERE employee_id = ?")
                .bind(employee_id)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows
        .into_iter()
        .map(|(start_date, end_date)| LeaveSpan {
            start_date,
            end_date,
        })
        .collect())
}

async fn fetch_leave_with_employee(
    pool: &MySqlPool,
    leave_id: u64,
) -> Result<Option<LeaveResponse>, sqlx::Error> {
    let sql = format!("{} WHERE l.id = ?", LEAVE_WITH_EMPLOYEE);
    sqlx::query_as::<_, LeaveResponse>(&sql)
        .bind(leave_id)
        .fetch_optional(pool)
        .await
}

/// Create leave request
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave created", body = LeaveResponse),
        (status = 400, description = "Eligibility check failed", body = Object, example = json!({
            "error": "MonthlyLimitExceeded",
            "message": "Employee has reached the monthly leave limit (maximum 1 day per month)"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let exists = employee_exists(pool.get_ref(), payload.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = payload.employee_id, "Failed to check employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let others = other_leave_spans(pool.get_ref(), payload.employee_id, None)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = payload.employee_id, "Failed to fetch leave history");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if let Err(denial) = leave_policy::evaluate(payload.start_date, payload.end_date, &others) {
        return Ok(denial_response(denial));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leaves (employee_id, start_date, end_date, reason)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to create leave");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let created = fetch_leave_with_employee(pool.get_ref(), result.last_insert_id())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created leave");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match created {
        Some(leave) => Ok(HttpResponse::Created().json(leave)),
        None => Ok(HttpResponse::Created().json(json!({
            "message": "Leave created"
        }))),
    }
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::new();
    if query.employee_id.is_some() {
        where_sql.push_str(" WHERE l.employee_id = ?");
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leaves l{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(employee_id) = query.employee_id {
        count_q = count_q.bind(employee_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count leaves");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "{}{} ORDER BY l.created_at DESC LIMIT ? OFFSET ?",
        LEAVE_WITH_EMPLOYEE, where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    if let Some(employee_id) = query.employee_id {
        data_q = data_q.bind(employee_id);
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch leave list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Every employee with its leave history
#[utoipa::path(
    get,
    path = "/api/leave/employees-with-leaves",
    responses(
        (status = 200, description = "Employees with their leaves", body = [EmployeeWithLeaves]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn employees_with_leaves(
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employees");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let leaves = sqlx::query_as::<_, Leave>("SELECT * FROM leaves ORDER BY start_date DESC")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch leaves");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let mut grouped: HashMap<u64, Vec<Leave>> = HashMap::new();
    for leave in leaves {
        grouped.entry(leave.employee_id).or_default().push(leave);
    }

    let response: Vec<EmployeeWithLeaves> = employees
        .into_iter()
        .map(|employee| {
            let leaves = grouped.remove(&employee.id).unwrap_or_default();
            EmployeeWithLeaves { employee, leaves }
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Leave history for one employee
#[utoipa::path(
    get,
    path = "/api/leave/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Leaves of the employee", body = [LeaveResponse]),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leaves_by_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let exists = employee_exists(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to check employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let sql = format!(
        "{} WHERE l.employee_id = ? ORDER BY l.start_date DESC",
        LEAVE_WITH_EMPLOYEE
    );
    let leaves = sqlx::query_as::<_, LeaveResponse>(&sql)
        .bind(employee_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee leaves");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// Get one leave request
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id", Path, description = "ID of the leave to fetch")
    ),
    responses(
        (status = 200, description = "Leave found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave not found", body = Object, example = json!({
            "message": "Leave not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = fetch_leave_with_employee(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to fetch leave");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave not found"
        }))),
    }
}

/// Update leave request
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id", Path, description = "ID of the leave to update")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave updated", body = LeaveResponse),
        (status = 400, description = "Eligibility check failed", body = Object, example = json!({
            "error": "YearlyLimitExceeded",
            "message": "Employee has reached the yearly leave limit (maximum 12 days per year)"
        })),
        (status = 404, description = "Leave or employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let payload = payload.into_inner();

    let existing = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to fetch leave for update");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let existing = match existing {
        Some(leave) => leave,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Leave not found"
            })));
        }
    };

    // Candidate = existing row with the provided fields layered on top.
    let employee_id = payload.employee_id.unwrap_or(existing.employee_id);
    let start_date = payload.start_date.unwrap_or(existing.start_date);
    let end_date = payload.end_date.unwrap_or(existing.end_date);

    let dates_or_employee_changed =
        payload.employee_id.is_some() || payload.start_date.is_some() || payload.end_date.is_some();

    if dates_or_employee_changed {
        if employee_id != existing.employee_id {
            let exists = employee_exists(pool.get_ref(), employee_id).await.map_err(|e| {
                error!(error = %e, employee_id, "Failed to check employee");
                ErrorInternalServerError("Internal Server Error")
            })?;

            if !exists {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }
        }

        let others = other_leave_spans(pool.get_ref(), employee_id, Some(leave_id))
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, "Failed to fetch leave history");
                ErrorInternalServerError("Internal Server Error")
            })?;

        if let Err(denial) = leave_policy::evaluate(start_date, end_date, &others) {
            return Ok(denial_response(denial));
        }
    }

    let mut fields: Vec<(&str, SqlValue)> = Vec::new();

    if let Some(employee_id) = payload.employee_id {
        fields.push(("employee_id", SqlValue::U64(employee_id)));
    }
    if let Some(start_date) = payload.start_date {
        fields.push(("start_date", SqlValue::Date(start_date)));
    }
    if let Some(end_date) = payload.end_date {
        fields.push(("end_date", SqlValue::Date(end_date)));
    }
    if let Some(reason) = payload.reason {
        fields.push(("reason", SqlValue::String(reason)));
    }

    let update = build_update_sql("leaves", fields, "id", leave_id)?;

    execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let updated = fetch_leave_with_employee(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to fetch updated leave");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match updated {
        Some(leave) => Ok(HttpResponse::Ok().json(leave)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave not found"
        }))),
    }
}

/// Delete leave request
#[utoipa::path(
    delete,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id", Path, description = "ID of the leave to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted"),
        (status = 404, description = "Leave not found", body = Object, example = json!({
            "message": "Leave not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let result = sqlx::query("DELETE FROM leaves WHERE id = ?")
        .bind(leave_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to delete leave");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave not found"
        })));
    }

    Ok(HttpResponse::NoContent().finish())
}

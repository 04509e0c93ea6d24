use crate::{
    auth::auth::AuthAdmin,
    auth::password::hash_password,
    model::{admin::Admin, gender::Gender},
    utils::db_utils::{SqlValue, build_update_sql, execute_update},
    utils::{email_cache, email_filter},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(serde::Serialize, ToSchema)]
pub struct AdminListResponse {
    pub data: Vec<Admin>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAdmin {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    /// Re-hashed before storage when present
    pub password: Option<String>,
    #[schema(example = "1990-01-01", format = "date", value_type = String)]
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// List Admins
#[utoipa::path(
    get,
    path = "/api/admin",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated admin list", body = AdminListResponse)
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_admins(
    pool: web::Data<MySqlPool>,
    query: web::Query<AdminQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count admins");
            ErrorInternalServerError("Database error")
        })?;

    let admins =
        sqlx::query_as::<_, Admin>("SELECT * FROM admins ORDER BY id DESC LIMIT ? OFFSET ?")
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch admins");
                ErrorInternalServerError("Database error")
            })?;

    Ok(HttpResponse::Ok().json(AdminListResponse {
        data: admins,
        page,
        per_page,
        total,
    }))
}

/// Get Admin by ID
#[utoipa::path(
    get,
    path = "/api/admin/{admin_id}",
    params(
        ("admin_id", Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Admin found", body = Admin),
        (status = 404, description = "Admin not found", body = Object, example = json!({
            "message": "Admin not found"
        }))
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_admin(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let admin_id = path.into_inner();

    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(admin_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to fetch admin");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match admin {
        Some(admin) => Ok(HttpResponse::Ok().json(admin)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Admin not found"
        }))),
    }
}

/// Shared by the id-keyed update and the profile update.
async fn apply_admin_update(
    pool: &MySqlPool,
    admin_id: u64,
    payload: UpdateAdmin,
) -> actix_web::Result<HttpResponse> {
    let existing = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(admin_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to fetch admin for update");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let existing = match existing {
        Some(admin) => admin,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Admin not found"
            })));
        }
    };

    if let Some(email) = payload.email.as_deref() {
        if email != existing.email {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM admins WHERE email = ? LIMIT 1)",
            )
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check email uniqueness");
                ErrorInternalServerError("Internal Server Error")
            })?;

            if taken {
                return Ok(HttpResponse::Conflict().json(json!({
                    "message": "Email already exists"
                })));
            }
        }
    }

    let mut fields: Vec<(&str, SqlValue)> = Vec::new();

    if let Some(first_name) = payload.first_name {
        fields.push(("first_name", SqlValue::String(first_name)));
    }
    if let Some(last_name) = payload.last_name {
        fields.push(("last_name", SqlValue::String(last_name)));
    }
    if let Some(email) = payload.email.clone() {
        fields.push(("email", SqlValue::String(email)));
    }
    if let Some(password) = payload.password.as_deref() {
        fields.push(("password", SqlValue::String(hash_password(password))));
    }
    if let Some(birth_date) = payload.birth_date {
        fields.push(("birth_date", SqlValue::Date(birth_date)));
    }
    if let Some(gender) = payload.gender {
        fields.push(("gender", SqlValue::String(gender.to_string())));
    }

    let update = build_update_sql("admins", fields, "id", admin_id)?;

    execute_update(pool, update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    // filter/cache track the live email set
    if let Some(new_email) = payload.email.as_deref() {
        if new_email != existing.email {
            email_filter::remove(&existing.email);
            email_filter::insert(new_email);
            email_cache::mark_taken(new_email).await;
        }
    }

    let updated = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(admin_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to fetch updated admin");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Update Admin
#[utoipa::path(
    put,
    path = "/api/admin/{admin_id}",
    params(
        ("admin_id", Path, description = "Admin ID")
    ),
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Admin updated", body = Admin),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_admin(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAdmin>,
) -> actix_web::Result<impl Responder> {
    apply_admin_update(pool.get_ref(), path.into_inner(), payload.into_inner()).await
}

/// Update own profile (id taken from the bearer token)
#[utoipa::path(
    put,
    path = "/api/admin/profile",
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Profile updated", body = Admin),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    auth: AuthAdmin,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateAdmin>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    apply_admin_update(pool.get_ref(), auth.admin_id, payload.into_inner()).await
}

/// Delete Admin
#[utoipa::path(
    delete,
    path = "/api/admin/{admin_id}",
    params(
        ("admin_id", Path, description = "Admin ID")
    ),
    responses(
        (status = 204, description = "Successfully deleted"),
        (status = 404, description = "Admin not found", body = Object, example = json!({
            "message": "Admin not found"
        }))
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_admin(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let admin_id = path.into_inner();

    let existing = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(admin_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to fetch admin for delete");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let existing = match existing {
        Some(admin) => admin,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Admin not found"
            })));
        }
    };

    sqlx::query("DELETE FROM admins WHERE id = ?")
        .bind(admin_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to delete admin");
            ErrorInternalServerError("Internal Server Error")
        })?;

    email_filter::remove(&existing.email);

    Ok(HttpResponse::NoContent().finish())
}

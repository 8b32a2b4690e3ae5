//! admin only endpoints, every handler checks the session role first
pub mod handlers;

use actix_web::{delete, get, put, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::respond::gen_extra_respond;

/**
 * @api {get} /api/v1/admin/users list every account
 * @apiVersion 0.0.1
 * @apiName AdminUsers
 * @apiGroup Admin
 * @apiSuccess {number} count
 * @apiSuccess {object[]} users
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/users
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[get("/api/v1/admin/users")]
async fn users(req: HttpRequest) -> impl Responder {
    gen_extra_respond("", handlers::users::req(req).await)
}

/**
 * @api {get} /api/v1/admin/withdraw-requests list every withdraw request
 * @apiVersion 0.0.1
 * @apiName AdminWithdrawRequests
 * @apiGroup Admin
 * @apiSuccess {object[]} withdrawRequests
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/withdraw-requests
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[get("/api/v1/admin/withdraw-requests")]
async fn withdraw_requests(req: HttpRequest) -> impl Responder {
    gen_extra_respond("", handlers::withdraw_requests::req(req).await)
}

/**
 * @api {put} /api/v1/admin/eligibility/:userId set an account's eligibility
 * @apiVersion 0.0.1
 * @apiName AdminEligibility
 * @apiGroup Admin
 * @apiBody {String="unverified","invested","verified"} status
 * @apiDescription mails the account first; becoming verified credits a verified referrer
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/eligibility/:userId
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct EligibilityRequest {
    status: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[put("/api/v1/admin/eligibility/{user_id}")]
async fn eligibility(
    req: HttpRequest,
    path: web::Path<String>,
    request_data: web::Json<EligibilityRequest>,
) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "User status updated successfully",
        handlers::eligibility::req(req, path.into_inner(), request_data.into_inner()).await,
    )
}

/**
 * @api {put} /api/v1/admin/role/:userId set an account's role
 * @apiVersion 0.0.1
 * @apiName AdminRole
 * @apiGroup Admin
 * @apiBody {String="User","Admin"} role
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/role/:userId
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct RoleRequest {
    role: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[put("/api/v1/admin/role/{user_id}")]
async fn role(
    req: HttpRequest,
    path: web::Path<String>,
    request_data: web::Json<RoleRequest>,
) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "User role updated successfully",
        handlers::role::req(req, path.into_inner(), request_data.into_inner()).await,
    )
}

/**
 * @api {put} /api/v1/admin/withdraw-status/:withdrawId approve or reject a withdraw request
 * @apiVersion 0.0.1
 * @apiName AdminWithdrawStatus
 * @apiGroup Admin
 * @apiBody {String="Approved","Rejected"} status
 * @apiDescription only Pending requests change; approval debits the converted balance
 * @apiSuccess {object} withdrawRequest
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/withdraw-status/:withdrawId
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct WithdrawStatusRequest {
    status: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[put("/api/v1/admin/withdraw-status/{withdraw_id}")]
async fn withdraw_status(
    req: HttpRequest,
    path: web::Path<String>,
    request_data: web::Json<WithdrawStatusRequest>,
) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "Withdraw status updated successfully",
        handlers::withdraw_status::req(req, path.into_inner(), request_data.into_inner()).await,
    )
}

/**
 * @api {delete} /api/v1/admin/user/:userId delete an account
 * @apiVersion 0.0.1
 * @apiName AdminDeleteUser
 * @apiGroup Admin
 * @apiSuccess {string} message   User deleted successfully
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/admin/user/:userId
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[delete("/api/v1/admin/user/{user_id}")]
async fn delete_user(req: HttpRequest, path: web::Path<String>) -> impl Responder {
    gen_extra_respond(
        "User deleted successfully",
        handlers::delete_user::req(req, path.into_inner()).await,
    )
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users)
        .service(withdraw_requests)
        .service(eligibility)
        .service(role)
        .service(withdraw_status)
        .service(delete_user);
}

//! account lifecycle http service
pub mod handlers;

use actix_web::{get, post, put, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::respond::{gen_extra_respond, gen_logout_respond, gen_session_respond};

/**
 * @api {post} /api/v1/signup create an account and mail its OTP
 * @apiVersion 0.0.1
 * @apiName Signup
 * @apiGroup AccountManager
 * @apiBody {String} name            at least 3 characters
 * @apiBody {String} email           account email
 * @apiBody {Number} phone           phone number
 * @apiBody {String} password        at least 8 characters
 * @apiBody {String} [referralCode]  referrer's link, `<name>/referral/<id>`
 * @apiExample {curl} Example usage:
 *   curl -X POST http://127.0.0.1:8066/api/v1/signup -H "Content-Type: application/json" -d
 *  '{"name": "Ann","email": "a@x.com","phone": 123,"password": "password1"}'
 * @apiSuccess {bool} success         true.
 * @apiSuccess {string} message       OTP sent to email. Verify your account.
 * @apiSuccess {object} user          the pending account.
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/signup
 */
#[derive(Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    name: Option<String>,
    email: Option<String>,
    phone: Option<i64>,
    password: Option<String>,
    referral_code: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/signup")]
async fn signup(request_data: web::Json<SignupRequest>) -> impl Responder {
    debug!("signup email {:?}", request_data.email);
    gen_extra_respond(
        "OTP sent to email. Verify your account.",
        handlers::signup::req(request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/verify-email confirm the signup OTP and open a session
 * @apiVersion 0.0.1
 * @apiName VerifyEmail
 * @apiGroup AccountManager
 * @apiBody {String} email   account email
 * @apiBody {String} otp     4 digit code from the mail
 * @apiSuccess {string} message     User verified successfully
 * @apiSuccess {object} user        the verified account, session set in the `token` cookie
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/verify-email
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    email: Option<String>,
    otp: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/verify-email")]
async fn verify_email(request_data: web::Json<VerifyOtpRequest>) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_session_respond(
        "User verified successfully",
        handlers::verify_email::req(request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/login login with email and password
 * @apiVersion 0.0.1
 * @apiName Login
 * @apiGroup AccountManager
 * @apiBody {String} email
 * @apiBody {String} password
 * @apiDescription an account still pending verification is deleted and the call fails with 403
 * @apiSuccess {string} message     User Logged In Successfully
 * @apiSuccess {object} user        session set in the `token` cookie
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/login
 */
#[derive(Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/login")]
async fn login(request_data: web::Json<LoginRequest>) -> impl Responder {
    debug!("login email {:?}", request_data.email);
    gen_session_respond(
        "User Logged In Successfully",
        handlers::login::req(request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/logout drop the session cookie
 * @apiVersion 0.0.1
 * @apiName Logout
 * @apiGroup AccountManager
 * @apiSuccess {string} message     User Logged Out Successfully
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/logout
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/logout")]
async fn logout() -> impl Responder {
    gen_logout_respond("User Logged Out Successfully")
}

/**
 * @api {post} /api/v1/forgot-password/otp mail a password reset OTP
 * @apiVersion 0.0.1
 * @apiName ForgotPasswordOtp
 * @apiGroup AccountManager
 * @apiBody {String} email
 * @apiSuccess {string} message     OTP sent successfully!
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/forgot-password/otp
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordOtpRequest {
    email: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/forgot-password/otp")]
async fn forgot_password_otp(request_data: web::Json<ForgotPasswordOtpRequest>) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "OTP sent successfully!",
        handlers::forgot_password::otp_req(request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/forgot-password/verify check a password reset OTP
 * @apiVersion 0.0.1
 * @apiName ForgotPasswordVerify
 * @apiGroup AccountManager
 * @apiBody {String} email
 * @apiBody {String} otp
 * @apiSuccess {string} message     OTP verified successfully.
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/forgot-password/verify
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/forgot-password/verify")]
async fn forgot_password_verify(request_data: web::Json<VerifyOtpRequest>) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "OTP verified successfully.",
        handlers::forgot_password::verify_req(request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/forgot-password/reset set a new password with a live OTP
 * @apiVersion 0.0.1
 * @apiName ForgotPasswordReset
 * @apiGroup AccountManager
 * @apiBody {String} email
 * @apiBody {String} password     at least 8 characters
 * @apiSuccess {string} message     Password reset successfully.
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/forgot-password/reset
 */
#[derive(Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    email: Option<String>,
    password: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/forgot-password/reset")]
async fn forgot_password_reset(request_data: web::Json<ResetPasswordRequest>) -> impl Responder {
    debug!("reset password for {:?}", request_data.email);
    gen_extra_respond(
        "Password reset successfully.",
        handlers::forgot_password::reset_req(request_data.into_inner()).await,
    )
}

/**
 * @api {get} /api/v1/me session account with its referral entries
 * @apiVersion 0.0.1
 * @apiName Me
 * @apiGroup AccountManager
 * @apiSuccess {object} user                 account
 * @apiSuccess {object[]} referredPoints     referral entries in insertion order
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/me
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[get("/api/v1/me")]
async fn me(req: HttpRequest) -> impl Responder {
    gen_extra_respond("", handlers::me::req(req).await)
}

/**
 * @api {put} /api/v1/password change password of the session account
 * @apiVersion 0.0.1
 * @apiName UpdatePassword
 * @apiGroup AccountManager
 * @apiBody {String} oldPassword
 * @apiBody {String} password
 * @apiBody {String} confirmPassword
 * @apiSuccess {string} message     Password updated successfully
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/password
 */
#[derive(Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    old_password: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[put("/api/v1/password")]
async fn update_password(
    req: HttpRequest,
    request_data: web::Json<UpdatePasswordRequest>,
) -> impl Responder {
    gen_extra_respond(
        "Password updated successfully",
        handlers::update_password::req(req, request_data.into_inner()).await,
    )
}

/**
 * @api {get} /api/v1/referred-users live public data of the accounts a referral link brought in
 * @apiVersion 0.0.1
 * @apiName ReferredUsers
 * @apiGroup AccountManager
 * @apiQuery {String} referralCode   referral link of the referrer
 * @apiSuccess {object[]} referredUsers   name, email, userLevel, totalPointsEarned, referralLink
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/referred-users?referralCode=ann/referral/id
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferredUsersRequest {
    referral_code: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[get("/api/v1/referred-users")]
async fn referred_users(
    req: HttpRequest,
    request_data: web::Query<ReferredUsersRequest>,
) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "",
        handlers::referred_users::req(req, request_data.into_inner()).await,
    )
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(verify_email)
        .service(login)
        .service(logout)
        .service(forgot_password_otp)
        .service(forgot_password_verify)
        .service(forgot_password_reset)
        .service(me)
        .service(update_password)
        .service(referred_users);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_service_call;
    use crate::utils::respond::BackendRespond;
    use crate::utils::token_auth::create_jwt;
    use actix_web::body::MessageBody;
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::http::header;
    use actix_web::{test, App, Error};
    use models::PsqlOp;
    use serde_json::{json, Value};
    use std::env;

    async fn init() -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = Error,
            InitError = (),
        >,
    > {
        env::set_var(
            "CONFIG",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../config_test.toml"),
        );
        common::log::init_logger();
        App::new()
            .app_data(crate::json_config())
            .configure(configure_routes)
    }

    #[actix_web::test]
    async fn test_signup_validation() {
        let service = test::init_service(init().await).await;

        let payload = json!({"name": "Ann", "email": "a@x.com", "password": "password1"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/signup",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert!(!res.success);
        assert_eq!(res.message, "All fields are required");

        let payload =
            json!({"name": "Ann", "email": "a@x.com", "phone": 123, "password": "pass"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/signup",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Password must be at least 8 characters");

        let payload = json!({
            "name": "Ann",
            "email": "a@x.com",
            "phone": 123,
            "password": "password1",
            "referralCode": "ann/referral"
        });
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/signup",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Invalid referral code format");
    }

    #[actix_web::test]
    async fn test_malformed_json_enveloped() {
        let service = test::init_service(init().await).await;
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/login",
            Some("{not json"),
            None::<String>
        );
        assert_eq!(status, 400);
        assert!(!res.success);
    }

    #[actix_web::test]
    async fn test_session_required() {
        let service = test::init_service(init().await).await;
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "get",
            "/api/v1/me",
            None::<String>,
            None::<String>
        );
        assert_eq!(status, 401);
        assert!(!res.success);

        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "get",
            "/api/v1/referred-users?referralCode=ann/referral/x",
            None::<String>,
            Some("forged".to_string())
        );
        assert_eq!(status, 401);
    }

    #[actix_web::test]
    async fn test_logout_clears_cookie() {
        let service = test::init_service(init().await).await;
        let req = test::TestRequest::post().uri("/api/v1/logout").to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        let cookie = resp.response().cookies().find(|c| c.name() == "token");
        assert_eq!(cookie.map(|c| c.value().to_string()), Some("".to_string()));
        let body = resp.into_body().try_into_bytes().unwrap();
        let res: BackendRespond<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.message, "User Logged Out Successfully");
    }

    #[actix_web::test]
    #[ignore = "needs the postgres instance from config_test.toml"]
    async fn test_account_manager_all_braced_ok() {
        let service = test::init_service(init().await).await;
        models::general::table_all_clear().await.unwrap();

        let payload = json!({
            "name": "Ann Lee",
            "email": "ann@x.com",
            "phone": 123,
            "password": "password1"
        });
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/signup",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200, "{}", res.message);
        let user = res.data.unwrap()["user"].clone();
        assert_eq!(user["status"], "pending");
        assert_eq!(user["userLevel"], 1);
        let user_id = user["id"].as_str().unwrap().to_string();
        assert_eq!(
            user["referralLink"],
            format!("ann-lee/referral/{}", user_id)
        );

        let payload = json!({"email": "ann@x.com", "otp": "0000"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/verify-email",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Invalid or expired OTP");

        //otp is only mailed, read it back from the store
        let mut db_cli = models::general::get_pg_pool_connect().await.unwrap();
        let stored = crate::utils::find_user(
            models::account_manager::UserFilter::ById(&user_id),
            common::error_code::AccountManagerError::UserNotFound,
            &mut db_cli,
        )
        .await
        .unwrap();
        let payload = json!({"email": "ann@x.com", "otp": stored.otp.unwrap()});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/verify-email",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200, "{}", res.message);
        assert_eq!(res.data.unwrap()["user"]["status"], "verified");

        let token = create_jwt(&user_id).unwrap();
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "get",
            "/api/v1/me",
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 200);
        assert_eq!(res.data.unwrap()["referredPoints"], json!([]));

        let payload = json!({
            "oldPassword": "password1",
            "password": "password2",
            "confirmPassword": "password3"
        });
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "put",
            "/api/v1/password",
            Some(payload.to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Passwords do not match");

        let payload = json!({"email": "ann@x.com", "password": "password1"});
        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/login",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200);

        let payload = json!({"email": "ann@x.com", "password": "password9"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/login",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 401);
        assert_eq!(res.message, "Invalid Email or Password");

        //forgot password: otp, verify, reset, and the code is single use
        let payload = json!({"email": "ann@x.com", "password": "password2"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/reset",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "OTP not verified. Please verify your OTP first.");

        let payload = json!({"email": "ann@x.com"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/otp",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200, "{}", res.message);
        assert_eq!(res.message, "OTP sent successfully!");

        //push the window into the past, the reset flow does not look at it
        let stored = crate::utils::find_user(
            models::account_manager::UserFilter::ById(&user_id),
            common::error_code::AccountManagerError::UserNotFound,
            &mut db_cli,
        )
        .await
        .unwrap();
        let reset_otp = stored.otp.unwrap();
        models::account_manager::UserInfoEntity::update_single(
            models::account_manager::UserUpdater::Otp(&reset_otp, 1),
            models::account_manager::UserFilter::ById(&user_id),
            &mut db_cli,
        )
        .await
        .unwrap();

        let payload = json!({"email": "ann@x.com", "otp": "0000"});
        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/verify",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);

        let payload = json!({"email": "ann@x.com", "otp": reset_otp});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/verify",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200, "{}", res.message);
        assert_eq!(res.message, "OTP verified successfully.");

        let payload = json!({"email": "ann@x.com", "password": "password2"});
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/reset",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200, "{}", res.message);
        assert_eq!(res.message, "Password reset successfully.");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/forgot-password/reset",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "OTP not verified. Please verify your OTP first.");

        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/login",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200);

        //referral signups land in the referrer's list
        let payload = json!({
            "name": "Bob",
            "email": "bob@x.com",
            "phone": 456,
            "password": "password1",
            "referralCode": format!("ann-lee/referral/{}", user_id)
        });
        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/signup",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 200);
        let url = format!(
            "/api/v1/referred-users?referralCode=ann-lee/referral/{}",
            user_id
        );
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "get",
            &url,
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 200);
        assert_eq!(res.data.unwrap()["referredUsers"][0]["name"], "Bob");

        //pending accounts are dropped on login
        let payload = json!({"email": "bob@x.com", "password": "password1"});
        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/login",
            Some(payload.to_string()),
            None::<String>
        );
        assert_eq!(status, 403);
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "get",
            &url,
            None::<String>,
            Some(token)
        );
        assert_eq!(status, 404);
        assert_eq!(res.message, "No referred users found");
    }
}

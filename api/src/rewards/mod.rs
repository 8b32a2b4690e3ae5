//! points, conversion and user side payment workflows
pub mod handlers;

use actix_web::http::StatusCode;
use actix_web::{post, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::respond::{gen_extra_respond, gen_status_respond};

/**
 * @api {post} /api/v1/daily-claim claim today's points
 * @apiVersion 0.0.1
 * @apiName DailyClaim
 * @apiGroup Rewards
 * @apiDescription adds 20 points to the daily pool and the lifetime total, five times per UTC day
 * @apiSuccess {string} message            Daily points added successfully
 * @apiSuccess {number} dailyClaimCount    claims made today
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/daily-claim
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/daily-claim")]
async fn daily_claim(req: HttpRequest) -> impl Responder {
    gen_extra_respond(
        "Daily points added successfully",
        handlers::daily_claim::req(req).await,
    )
}

/**
 * @api {post} /api/v1/investment record an investment, eligibility becomes invested
 * @apiVersion 0.0.1
 * @apiName Investment
 * @apiGroup Rewards
 * @apiBody {Number} amount   at least 1000
 * @apiSuccess {string} message     Investment successful. User is now eligible.
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/investment
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    amount: Option<u64>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/investment")]
async fn investment(req: HttpRequest, request_data: web::Json<InvestmentRequest>) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "Investment successful. User is now eligible.",
        handlers::investment::req(req, request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/convert-points move the daily pool into the converted balance
 * @apiVersion 0.0.1
 * @apiName ConvertPoints
 * @apiGroup Rewards
 * @apiDescription 4 points make one currency unit, the remainder is dropped with the pool
 * @apiSuccess {number} converted          units credited by this call
 * @apiSuccess {number} convertedBalance   balance after the call
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/convert-points
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/convert-points")]
async fn convert_points(req: HttpRequest) -> impl Responder {
    gen_extra_respond(
        "Your Bep coins have been successfully exchanged.",
        handlers::convert_points::daily_req(req).await,
    )
}

/**
 * @api {post} /api/v1/convert-referred-points move every referral entry into the converted balance
 * @apiVersion 0.0.1
 * @apiName ConvertReferredPoints
 * @apiGroup Rewards
 * @apiSuccess {number} totalReferredPoints   points taken from the entries
 * @apiSuccess {number} converted             units credited by this call
 * @apiSuccess {number} convertedBalance      balance after the call
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/convert-referred-points
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/convert-referred-points")]
async fn convert_referred_points(req: HttpRequest) -> impl Responder {
    gen_extra_respond(
        "The coins from your referral link have been successfully exchanged.",
        handlers::convert_points::referred_req(req).await,
    )
}

/**
 * @api {post} /api/v1/feedback replace the account's feedback
 * @apiVersion 0.0.1
 * @apiName Feedback
 * @apiGroup Rewards
 * @apiBody {String} content
 * @apiSuccess {object} feedback   id, content and the author's name and email, HTTP 201
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/feedback
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    content: Option<String>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/feedback")]
async fn feedback(req: HttpRequest, request_data: web::Json<FeedbackRequest>) -> impl Responder {
    gen_status_respond(
        StatusCode::CREATED,
        "Feedback submitted successfully",
        handlers::feedback::req(req, request_data.into_inner()).await,
    )
}

/**
 * @api {post} /api/v1/payment-image upload proof of payment
 * @apiVersion 0.0.1
 * @apiName PaymentImage
 * @apiGroup Rewards
 * @apiBody {Binary} body   raw image bytes
 * @apiSuccess {string} filePath   where the image was stored
 * @apiSuccess {object} user
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/payment-image
 */
#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/payment-image")]
async fn payment_image(req: HttpRequest, body: web::Bytes) -> impl Responder {
    debug!("payment image of {} bytes", body.len());
    gen_extra_respond(
        "Uploaded successfully. Your request is being processed.",
        handlers::payment_image::req(req, body).await,
    )
}

/**
 * @api {post} /api/v1/withdraw-request ask to withdraw part of the converted balance
 * @apiVersion 0.0.1
 * @apiName WithdrawRequest
 * @apiGroup Rewards
 * @apiBody {Number} amount   more than 0 and no more than the converted balance
 * @apiSuccess {object} withdrawRequest   the pending request
 * @apiSampleRequest http://127.0.0.1:8066/api/v1/withdraw-request
 */
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequestBody {
    amount: Option<u64>,
}

#[tracing::instrument(skip_all,fields(trace_id = common::log::generate_trace_id()))]
#[post("/api/v1/withdraw-request")]
async fn withdraw_request(
    req: HttpRequest,
    request_data: web::Json<WithdrawRequestBody>,
) -> impl Responder {
    debug!("{:?}", request_data.0);
    gen_extra_respond(
        "Withdraw request submitted successfully",
        handlers::withdraw_request::req(req, request_data.into_inner()).await,
    )
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(daily_claim)
        .service(investment)
        .service(convert_points)
        .service(convert_referred_points)
        .service(feedback)
        .service(payment_image)
        .service(withdraw_request);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_service_call;
    use crate::utils::respond::BackendRespond;
    use crate::utils::token_auth::create_jwt;
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::http::header;
    use actix_web::{test, App, Error};
    use common::data_structures::account_manager::Eligibility;
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
    async fn test_rewards_need_session() {
        let service = test::init_service(init().await).await;
        for api in [
            "/api/v1/daily-claim",
            "/api/v1/convert-points",
            "/api/v1/convert-referred-points",
        ] {
            let (status, res): (u16, BackendRespond<Value>) =
                test_service_call!(service, "post", api, None::<String>, None::<String>);
            assert_eq!(status, 401);
            assert!(!res.success);
        }
    }

    #[actix_web::test]
    async fn test_rewards_body_validation() {
        let service = test::init_service(init().await).await;
        let token = create_jwt("7f0c4b62-5b7a-4c55-9f0e-8a3c1c9c2a11").unwrap();

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/investment",
            Some(json!({"amount": 999}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(
            res.message,
            "Amount is compulsory and must be at least 1000"
        );

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/feedback",
            Some(json!({"content": ""}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Feedback content is required");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/payment-image",
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "File is required");

        let (status, _res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/withdraw-request",
            Some(json!({"amount": 0}).to_string()),
            Some(token)
        );
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    #[ignore = "needs the postgres instance from config_test.toml"]
    async fn test_rewards_all_braced_ok() {
        use crate::utils::password::hash_password;
        use crate::utils::tests::sample_user;
        use common::data_structures::account_manager::AccountStatus;
        use models::account_manager::UserInfoEntity;
        use models::PsqlOp;

        let service = test::init_service(init().await).await;
        models::general::table_all_clear().await.unwrap();
        let mut db_cli = models::general::get_pg_pool_connect().await.unwrap();
        let mut user = sample_user("claim@x.com");
        user.password_hash = hash_password("password1").unwrap();
        user.status = AccountStatus::Verified;
        user.card_details.card_number1 = "111".to_string();
        user.card_details.card_number2 = "11111".to_string();
        user.card_details.card_number3 = "11".to_string();
        UserInfoEntity::new_with_specified(user.clone())
            .insert(&mut db_cli)
            .await
            .unwrap();
        let token = create_jwt(&user.id).unwrap();

        for expected in 1..=5 {
            let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
                service,
                "post",
                "/api/v1/daily-claim",
                None::<String>,
                Some(token.clone())
            );
            assert_eq!(status, 200);
            assert_eq!(res.data.unwrap()["dailyClaimCount"], expected);
        }
        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/daily-claim",
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Daily claim limit reached. Try again tomorrow.");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/convert-points",
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 200);
        let data = res.data.unwrap();
        assert_eq!(data["converted"], 25);
        assert_eq!(data["user"]["dailyPoints"]["totalPoints"], 0);

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/convert-referred-points",
            None::<String>,
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "No referred points found for the user");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/investment",
            Some(json!({"amount": 1000}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 200);
        assert_eq!(
            res.data.unwrap()["user"]["eligible"],
            Eligibility::Invested.to_string()
        );

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/withdraw-request",
            Some(json!({"amount": 26}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 400);
        assert_eq!(res.message, "Insufficient converted balance");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/withdraw-request",
            Some(json!({"amount": 25}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 200);
        assert_eq!(res.data.unwrap()["withdrawRequest"]["status"], "Pending");

        let (status, res): (u16, BackendRespond<Value>) = test_service_call!(
            service,
            "post",
            "/api/v1/feedback",
            Some(json!({"content": "nice"}).to_string()),
            Some(token.clone())
        );
        assert_eq!(status, 201);
        assert_eq!(res.data.unwrap()["feedback"]["user"]["email"], "claim@x.com");
    }
}

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use common::constants::{SESSION_COOKIE_NAME, TOKEN_EXPIRE_TIME};
use common::error_code::{BackendError, BackendRes, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// Body shape of every reply: `{success, message, ...payload}`.
#[derive(Deserialize, Serialize, Debug)]
pub struct BackendRespond<T> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn generate_ok_respond<D: Serialize>(
    status: StatusCode,
    message: &str,
    info: Option<D>,
) -> HttpResponse {
    HttpResponseBuilder::new(status).json(BackendRespond {
        success: true,
        message: message.to_string(),
        data: info,
    })
}

pub fn generate_error_respond<E: ErrorCode + Display>(error: E) -> HttpResponse {
    debug!("return_error_respond: {}", error.to_string());
    HttpResponseBuilder::new(status_of(error.code())).json(BackendRespond::<()> {
        success: false,
        message: error.to_string(),
        data: None,
    })
}

pub fn gen_extra_respond<D: Serialize, E: ErrorCode + Display>(
    message: &str,
    inner_res: BackendRes<D, E>,
) -> HttpResponse {
    gen_status_respond(StatusCode::OK, message, inner_res)
}

pub fn gen_status_respond<D: Serialize, E: ErrorCode + Display>(
    status: StatusCode,
    message: &str,
    inner_res: BackendRes<D, E>,
) -> HttpResponse {
    match inner_res {
        Ok(data) => generate_ok_respond(status, message, data),
        Err(error) => generate_error_respond(error),
    }
}

/// Reply carrying a fresh session token in the `token` cookie.
pub fn gen_session_respond<D: Serialize>(
    message: &str,
    inner_res: Result<(String, D), BackendError>,
) -> HttpResponse {
    match inner_res {
        Ok((token, data)) => {
            let mut builder = HttpResponse::Ok();
            builder.cookie(session_cookie(token));
            builder.json(BackendRespond {
                success: true,
                message: message.to_string(),
                data: Some(data),
            })
        }
        Err(error) => generate_error_respond(error),
    }
}

pub fn gen_logout_respond(message: &str) -> HttpResponse {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).json(BackendRespond::<()> {
        success: true,
        message: message.to_string(),
        data: None,
    })
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(Duration::milliseconds(TOKEN_EXPIRE_TIME as i64))
        .finish()
}

//malformed bodies go through the same envelope instead of actix's plain text
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let resp = generate_error_respond(BackendError::RequestParamInvalid(message));
    actix_web::error::InternalError::from_response(err, resp).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use common::error_code::{AccountManagerError, RewardsError};
    use serde_json::{json, Value};

    #[derive(Serialize)]
    struct CountReply {
        count: u8,
    }

    fn body_json(resp: HttpResponse) -> Value {
        let bytes = resp.into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_respond_flattens_payload() {
        let resp = gen_extra_respond::<_, BackendError>(
            "ok",
            Ok(Some(CountReply { count: 2 })),
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp),
            json!({"success": true, "message": "ok", "count": 2})
        );
    }

    #[test]
    fn test_respond_error_status() {
        let resp = gen_extra_respond::<CountReply, BackendError>(
            "ok",
            Err(RewardsError::DailyClaimLimitReached.into()),
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp),
            json!({
                "success": false,
                "message": "Daily claim limit reached. Try again tomorrow."
            })
        );

        let resp = gen_extra_respond::<CountReply, BackendError>(
            "ok",
            Err(AccountManagerError::UnverifiedAccountDeleted.into()),
        );
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(Duration::days(15)));

        let resp = gen_logout_respond("bye");
        let removal = resp.cookies().next().unwrap();
        assert_eq!(removal.name(), "token");
        assert_eq!(removal.value(), "");
    }
}

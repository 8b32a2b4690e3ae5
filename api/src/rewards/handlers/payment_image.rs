use actix_web::web::Bytes;
use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::env::CONF;
use common::error_code::{BackendError, BackendRes};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::mail::{payment_image_admin_template, payment_image_user_template, send_email};
use crate::utils::storage::{keep_payment_image_if, save_payment_image};
use crate::utils::{get_session_user, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentImageReply {
    pub file_path: String,
    pub user: UserInfo,
}

pub async fn req(req: HttpRequest, body: Bytes) -> BackendRes<PaymentImageReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    if body.is_empty() {
        Err(BackendError::RequestParamInvalid(
            "File is required".to_string(),
        ))?;
    }

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut user = get_session_user(&user_id, &mut db_cli).await?;
    let file_path = save_payment_image(&CONF.upload_dir, &user.id, &body).await?;
    let recorded = notify_and_record(&user, &file_path, &mut db_cli).await;
    keep_payment_image_if(&file_path, recorded).await?;
    user.payment_image = Some(file_path.clone());
    info!("user {} uploaded payment image {}", user.id, file_path);
    Ok(Some(PaymentImageReply { file_path, user }))
}

async fn notify_and_record(
    user: &UserInfo,
    file_path: &str,
    cli: &mut PgLocalCli<'_>,
) -> Result<(), BackendError> {
    send_email(
        &user.email,
        "Image Uploaded",
        payment_image_user_template(&user.name),
    )
    .await?;
    send_email(
        &CONF.admin_email,
        "New Image Uploaded",
        payment_image_admin_template(&user.name, &user.email, file_path),
    )
    .await?;
    UserInfoEntity::update_single(
        UserUpdater::PaymentImage(file_path),
        UserFilter::ById(&user.id),
        cli,
    )
    .await?;
    Ok(())
}

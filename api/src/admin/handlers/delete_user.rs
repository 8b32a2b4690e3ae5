use actix_web::HttpRequest;
use common::error_code::{AccountManagerError, BackendRes};
use models::account_manager::{UserFilter, UserInfoEntity};
use models::PsqlOp;
use tracing::info;

use super::admin_connect;
use crate::utils::validate_user_id;

/// Referral entries naming the deleted account stay with their referrers.
pub async fn req(req: HttpRequest, user_id: String) -> BackendRes<()> {
    validate_user_id(&user_id)?;
    let (admin, mut db_cli) = admin_connect(&req).await?;
    let deleted = UserInfoEntity::delete(UserFilter::ById(&user_id), &mut db_cli).await?;
    if deleted == 0 {
        Err(AccountManagerError::UserNotFound)?;
    }
    info!("admin {} deleted user {}", admin.id, user_id);
    Ok(None)
}

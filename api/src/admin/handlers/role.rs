use actix_web::HttpRequest;
use common::data_structures::account_manager::UserRole;
use common::error_code::{AccountManagerError, BackendError, BackendRes};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::PsqlOp;
use tracing::info;

use super::{admin_connect, UserReply};
use crate::admin::RoleRequest;
use crate::utils::{find_user, validate_user_id};

pub async fn req(req: HttpRequest, user_id: String, request_data: RoleRequest) -> BackendRes<UserReply> {
    let role = match request_data.role {
        Some(role) if !role.is_empty() => role,
        _ => Err(BackendError::RequestParamInvalid(
            "Role is required".to_string(),
        ))?,
    };
    validate_user_id(&user_id)?;
    let role: UserRole = role
        .parse()
        .map_err(|_| BackendError::RequestParamInvalid(format!("Invalid role: {}", role)))?;

    let (admin, mut db_cli) = admin_connect(&req).await?;
    let mut user = find_user(
        UserFilter::ById(&user_id),
        AccountManagerError::UserNotFound,
        &mut db_cli,
    )
    .await?;
    UserInfoEntity::update_single(UserUpdater::Role(role), UserFilter::ById(&user.id), &mut db_cli)
        .await?;
    user.user_role = role;
    info!("admin {} set role of {} to {}", admin.id, user.id, role);
    Ok(Some(UserReply { user }))
}

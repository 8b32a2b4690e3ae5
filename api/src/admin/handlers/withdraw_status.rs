use actix_web::HttpRequest;
use common::data_structures::withdraw::{WithdrawRequest, WithdrawStatus};
use common::error_code::{BackendError, BackendRes, RewardsError};
use models::is_not_found;
use models::withdraw::{WithdrawFilter, WithdrawRequestEntity, WithdrawUpdater};
use models::PsqlOp;
use tracing::info;

use super::admin_connect;
use crate::admin::WithdrawStatusRequest;
use crate::rewards::handlers::withdraw_request::WithdrawReply;
use crate::utils::points::debit_balance;
use crate::utils::{lock_session_user, save_ledger, validate_user_id};

pub async fn req(
    req: HttpRequest,
    withdraw_id: String,
    request_data: WithdrawStatusRequest,
) -> BackendRes<WithdrawReply> {
    let status = match request_data.status {
        Some(status) if !status.is_empty() => status,
        _ => Err(BackendError::RequestParamInvalid(
            "Status is required".to_string(),
        ))?,
    };
    //withdraw ids are uuids as well
    validate_user_id(&withdraw_id)
        .map_err(|_| BackendError::RequestParamInvalid("Invalid withdraw ID format".to_string()))?;
    let status: WithdrawStatus = status
        .parse()
        .map_err(|_| BackendError::RequestParamInvalid(format!("Invalid status: {}", status)))?;
    if status == WithdrawStatus::Pending {
        Err(BackendError::RequestParamInvalid(
            "Status must be Approved or Rejected".to_string(),
        ))?;
    }

    let (admin, mut db_cli) = admin_connect(&req).await?;
    let mut db_cli = db_cli.begin().await?;
    let mut withdraw_request: WithdrawRequest =
        match WithdrawRequestEntity::find_single(WithdrawFilter::ByIdForUpdate(&withdraw_id), &mut db_cli)
            .await
        {
            Ok(entity) => entity.into_inner(),
            Err(err) if is_not_found(&err) => Err(RewardsError::WithdrawNotFound)?,
            Err(err) => Err(err)?,
        };
    if withdraw_request.status != WithdrawStatus::Pending {
        Err(RewardsError::WithdrawAlreadyProcessed)?;
    }

    if status == WithdrawStatus::Approved {
        let mut user = lock_session_user(&withdraw_request.user_id, &mut db_cli).await?;
        debit_balance(&mut user.ledger, withdraw_request.amount)?;
        save_ledger(&user.id, &user.ledger, &mut db_cli).await?;
    }
    WithdrawRequestEntity::update_single(
        WithdrawUpdater::Status(status),
        WithdrawFilter::ById(&withdraw_id),
        &mut db_cli,
    )
    .await?;
    db_cli.commit().await?;
    withdraw_request.status = status;
    info!(
        "admin {} set withdraw {} to {}",
        admin.id, withdraw_request.id, status
    );
    Ok(Some(WithdrawReply { withdraw_request }))
}

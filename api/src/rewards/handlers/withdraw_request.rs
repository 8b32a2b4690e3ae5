use actix_web::HttpRequest;
use common::data_structures::withdraw::{WithdrawRequest, WithdrawStatus};
use common::error_code::{BackendError, BackendRes, RewardsError};
use models::general::get_pg_pool_connect;
use models::withdraw::WithdrawRequestEntity;
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::rewards::WithdrawRequestBody;
use crate::utils::{get_session_user, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawReply {
    pub withdraw_request: WithdrawRequest,
}

pub async fn req(req: HttpRequest, request_data: WithdrawRequestBody) -> BackendRes<WithdrawReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let amount = match request_data.amount {
        Some(amount) if amount > 0 => amount,
        _ => Err(BackendError::RequestParamInvalid(
            "Amount must be greater than 0".to_string(),
        ))?,
    };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = get_session_user(&user_id, &mut db_cli).await?;
    //the balance is debited only when an admin approves
    if amount > user.ledger.converted_balance {
        Err(RewardsError::InsufficientBalance)?;
    }
    let withdraw_request = WithdrawRequest {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        amount,
        status: WithdrawStatus::Pending,
    };
    WithdrawRequestEntity::new_with_specified(withdraw_request.clone())
        .insert(&mut db_cli)
        .await?;
    info!("user {} asked to withdraw {}", user.id, amount);
    Ok(Some(WithdrawReply { withdraw_request }))
}

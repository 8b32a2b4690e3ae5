use actix_web::HttpRequest;
use common::constants::MIN_INVESTMENT_AMOUNT;
use common::data_structures::account_manager::Eligibility;
use common::error_code::{BackendRes, RewardsError};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};
use tracing::info;

use super::UserReply;
use crate::rewards::InvestmentRequest;
use crate::utils::{lock_session_user, token_auth};

pub async fn req(req: HttpRequest, request_data: InvestmentRequest) -> BackendRes<UserReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    match request_data.amount {
        Some(amount) if amount >= MIN_INVESTMENT_AMOUNT => {}
        _ => Err(RewardsError::InvestmentTooLow)?,
    }

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut db_cli = db_cli.begin().await?;
    let mut user = lock_session_user(&user_id, &mut db_cli).await?;
    //an admin decision is never downgraded by another investment
    if user.eligible == Eligibility::Unverified {
        UserInfoEntity::update_single(
            UserUpdater::Eligible(Eligibility::Invested),
            UserFilter::ById(&user.id),
            &mut db_cli,
        )
        .await?;
        user.eligible = Eligibility::Invested;
        info!("user {} invested, waiting for admin", user.id);
    }
    db_cli.commit().await?;
    Ok(Some(UserReply { user }))
}

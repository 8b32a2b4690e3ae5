use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::error_code::BackendRes;
use models::general::get_pg_pool_connect;
use models::referral::{ReferredPointEntity, ReferredPointFilter, ReferredPointUpdater};
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::points::{convert_daily_points, convert_referred_points};
use crate::utils::{lock_session_user, save_ledger, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConvertReply {
    pub converted: u64,
    pub converted_balance: u64,
    pub user: UserInfo,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConvertReferredReply {
    pub total_referred_points: u64,
    pub converted: u64,
    pub converted_balance: u64,
    pub user: UserInfo,
}

pub async fn daily_req(req: HttpRequest) -> BackendRes<ConvertReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut db_cli = db_cli.begin().await?;
    let mut user = lock_session_user(&user_id, &mut db_cli).await?;
    let converted = convert_daily_points(&mut user.ledger);
    save_ledger(&user.id, &user.ledger, &mut db_cli).await?;
    db_cli.commit().await?;
    info!("user {} converted daily pool into {}", user.id, converted);
    Ok(Some(ConvertReply {
        converted,
        converted_balance: user.ledger.converted_balance,
        user,
    }))
}

pub async fn referred_req(req: HttpRequest) -> BackendRes<ConvertReferredReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut db_cli = db_cli.begin().await?;
    //the account lock also serialises attribution into this list
    let mut user = lock_session_user(&user_id, &mut db_cli).await?;
    let entries: Vec<u64> =
        ReferredPointEntity::find(ReferredPointFilter::ByAccountId(&user.id), &mut db_cli)
            .await?
            .into_iter()
            .map(|entity| entity.referred_point.points)
            .collect();
    let (total_referred_points, converted) = convert_referred_points(&mut user.ledger, &entries)?;
    ReferredPointEntity::update(
        ReferredPointUpdater::Points(0),
        ReferredPointFilter::ByAccountId(&user.id),
        &mut db_cli,
    )
    .await?;
    save_ledger(&user.id, &user.ledger, &mut db_cli).await?;
    db_cli.commit().await?;
    info!(
        "user {} converted {} referred points into {}",
        user.id, total_referred_points, converted
    );
    Ok(Some(ConvertReferredReply {
        total_referred_points,
        converted,
        converted_balance: user.ledger.converted_balance,
        user,
    }))
}

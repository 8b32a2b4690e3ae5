use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::error_code::BackendRes;
use common::utils::time::today;
use models::general::get_pg_pool_connect;
use models::PgLocalCli;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::points::claim_daily;
use crate::utils::{lock_session_user, save_ledger, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyClaimReply {
    pub daily_claim_count: u8,
    pub user: UserInfo,
}

pub async fn req(req: HttpRequest) -> BackendRes<DailyClaimReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut db_cli = db_cli.begin().await?;
    let mut user = lock_session_user(&user_id, &mut db_cli).await?;
    let daily_claim_count = claim_daily(&mut user.ledger, today())?;
    save_ledger(&user.id, &user.ledger, &mut db_cli).await?;
    db_cli.commit().await?;
    info!("user {} daily claim {}", user.id, daily_claim_count);
    Ok(Some(DailyClaimReply {
        daily_claim_count,
        user,
    }))
}

use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::data_structures::referral::ReferredPoint;
use common::error_code::BackendRes;
use models::general::get_pg_pool_connect;
use models::referral::{ReferredPointEntity, ReferredPointFilter};
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};

use crate::utils::{get_session_user, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReply {
    pub user: UserInfo,
    pub referred_points: Vec<ReferredPoint>,
}

pub async fn req(req: HttpRequest) -> BackendRes<ProfileReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = get_session_user(&user_id, &mut db_cli).await?;
    let referred_points =
        ReferredPointEntity::find(ReferredPointFilter::ByAccountId(&user.id), &mut db_cli)
            .await?
            .into_iter()
            .map(|entity| entity.into_inner())
            .collect();
    Ok(Some(ProfileReply {
        user,
        referred_points,
    }))
}

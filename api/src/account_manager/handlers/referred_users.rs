use std::collections::HashSet;

use actix_web::HttpRequest;
use common::data_structures::referral::ReferredUserDetails;
use common::error_code::{BackendError, BackendRes, RewardsError};
use models::account_manager::{UserFilter, UserInfoEntity};
use models::general::get_pg_pool_connect;
use models::referral::{ReferredPointEntity, ReferredPointFilter};
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};

use crate::account_manager::ReferredUsersRequest;
use crate::utils::{find_user, get_session_user, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferredUsersReply {
    pub referred_users: Vec<ReferredUserDetails>,
}

/// First occurrence of every referred account, in list order.
pub fn distinct_referred_ids(entries: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut distinct = vec![];
    for id in entries {
        if seen.insert(id.as_str()) {
            distinct.push(id.as_str());
        }
    }
    distinct
}

pub async fn req(req: HttpRequest, request_data: ReferredUsersRequest) -> BackendRes<ReferredUsersReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let referral_code = request_data
        .referral_code
        .filter(|code| !code.is_empty())
        .ok_or(BackendError::RequestParamInvalid(
            "Referral code is required".to_string(),
        ))?;

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    get_session_user(&user_id, &mut db_cli).await?;
    let owner = find_user(
        UserFilter::ByReferralLink(&referral_code),
        RewardsError::ReferrerNotFound,
        &mut db_cli,
    )
    .await?;

    let referred_ids: Vec<String> =
        ReferredPointEntity::find(ReferredPointFilter::ByAccountId(&owner.id), &mut db_cli)
            .await?
            .into_iter()
            .map(|entity| entity.referred_point.referred_user_id)
            .collect();

    //snapshots are write time only, always read the live account
    let mut referred_users = vec![];
    for id in distinct_referred_ids(&referred_ids) {
        let live = UserInfoEntity::find(UserFilter::ById(id), &mut db_cli).await?;
        if let Some(entity) = live.first() {
            referred_users.push(ReferredUserDetails::from(&entity.user_info));
        }
    }
    if referred_users.is_empty() {
        Err(RewardsError::ReferredUsersNotFound)?;
    }
    Ok(Some(ReferredUsersReply { referred_users }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_referred_ids_keeps_order() {
        let ids: Vec<String> = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(distinct_referred_ids(&ids), vec!["b", "a", "c"]);
        assert!(distinct_referred_ids(&[]).is_empty());
    }
}

use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::error_code::BackendRes;
use models::account_manager::{UserFilter, UserInfoEntity};
use models::PsqlOp;
use serde::{Deserialize, Serialize};

use super::admin_connect;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UsersReply {
    pub count: usize,
    pub users: Vec<UserInfo>,
}

pub async fn req(req: HttpRequest) -> BackendRes<UsersReply> {
    let (_admin, mut db_cli) = admin_connect(&req).await?;
    let users: Vec<UserInfo> = UserInfoEntity::find(UserFilter::All, &mut db_cli)
        .await?
        .into_iter()
        .map(|entity| entity.into_inner())
        .collect();
    Ok(Some(UsersReply {
        count: users.len(),
        users,
    }))
}

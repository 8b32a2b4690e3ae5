use actix_web::HttpRequest;
use common::data_structures::withdraw::WithdrawRequest;
use common::error_code::BackendRes;
use models::withdraw::{WithdrawFilter, WithdrawRequestEntity};
use models::PsqlOp;
use serde::{Deserialize, Serialize};

use super::admin_connect;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequestsReply {
    pub withdraw_requests: Vec<WithdrawRequest>,
}

pub async fn req(req: HttpRequest) -> BackendRes<WithdrawRequestsReply> {
    let (_admin, mut db_cli) = admin_connect(&req).await?;
    let withdraw_requests = WithdrawRequestEntity::find(WithdrawFilter::All, &mut db_cli)
        .await?
        .into_iter()
        .map(|entity| entity.into_inner())
        .collect();
    Ok(Some(WithdrawRequestsReply { withdraw_requests }))
}

pub mod delete_user;
pub mod eligibility;
pub mod role;
pub mod users;
pub mod withdraw_requests;
pub mod withdraw_status;

use actix_web::HttpRequest;
use common::data_structures::account_manager::UserInfo;
use common::error_code::BackendError;
use models::general::get_pg_pool_connect;
use models::PgLocalCli;

use crate::utils::{require_admin, token_auth};

pub use crate::account_manager::handlers::UserReply;

/// Session check plus role check, handing back the connection for the rest of the request.
pub(crate) async fn admin_connect(
    req: &HttpRequest,
) -> Result<(UserInfo, PgLocalCli<'static>), BackendError> {
    let user_id = token_auth::validate_credentials(req)?;
    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let admin = require_admin(&user_id, &mut db_cli).await?;
    Ok((admin, db_cli))
}

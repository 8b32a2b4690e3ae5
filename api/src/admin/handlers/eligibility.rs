use actix_web::HttpRequest;
use common::data_structures::account_manager::{Eligibility, UserInfo};
use common::data_structures::referral::ReferredPoint;
use common::error_code::{AccountManagerError, BackendError, BackendRes, RewardsError};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::referral::{referral_count, ReferredPointEntity};
use models::{PgLocalCli, PsqlOp};
use tracing::{debug, info};

use super::{admin_connect, UserReply};
use crate::admin::EligibilityRequest;
use crate::utils::level::{recompute_level, referral_points_for_level};
use crate::utils::mail::{eligibility_template, send_email};
use crate::utils::points::earn_points;
use crate::utils::{find_user, lock_session_user, save_ledger, validate_user_id};

pub async fn req(
    req: HttpRequest,
    user_id: String,
    request_data: EligibilityRequest,
) -> BackendRes<UserReply> {
    let status = match request_data.status {
        Some(status) if !status.is_empty() => status,
        _ => Err(BackendError::RequestParamInvalid(
            "Status is required".to_string(),
        ))?,
    };
    validate_user_id(&user_id)?;
    let eligible: Eligibility = status.parse().map_err(|_| {
        BackendError::RequestParamInvalid(format!("Invalid eligibility status: {}", status))
    })?;

    let (_admin, mut db_cli) = admin_connect(&req).await?;
    let user = find_user(
        UserFilter::ById(&user_id),
        AccountManagerError::UserNotFound,
        &mut db_cli,
    )
    .await?;
    //the notification goes out first, a mail failure leaves the account untouched
    send_email(
        &user.email,
        "Update on Your Eligibility Status",
        eligibility_template(&user.name, &eligible.to_string()),
    )
    .await?;

    let mut db_cli = db_cli.begin().await?;
    let mut user = lock_session_user(&user_id, &mut db_cli).await?;
    let previous = user.eligible;
    UserInfoEntity::update_single(
        UserUpdater::Eligible(eligible),
        UserFilter::ById(&user.id),
        &mut db_cli,
    )
    .await?;
    user.eligible = eligible;

    if previous != Eligibility::Verified && eligible == Eligibility::Verified {
        if let Some(referrer_id) = user.referred_by.clone() {
            attribute_referral(&user, &referrer_id, &mut db_cli).await?;
        }
    }
    db_cli.commit().await?;
    info!("user {} eligibility {} -> {}", user.id, previous, eligible);
    Ok(Some(UserReply { user }))
}

/// Credit the referrer of a newly verified account, if the referrer is verified too.
async fn attribute_referral(
    user: &UserInfo,
    referrer_id: &str,
    cli: &mut PgLocalCli<'_>,
) -> Result<(), BackendError> {
    let referrer = find_user(
        UserFilter::ByIdForUpdate(referrer_id),
        RewardsError::ReferrerNotFound,
        cli,
    )
    .await?;
    if referrer.eligible != Eligibility::Verified {
        debug!("referrer {} not verified, no points for {}", referrer.id, user.id);
        return Ok(());
    }

    let points = referral_points_for_level(referrer.ledger.user_level);
    ReferredPointEntity::new_with_specified(ReferredPoint {
        account_id: referrer.id.clone(),
        referred_user_id: user.id.clone(),
        points,
        user_details: user.into(),
    })
    .insert(cli)
    .await?;

    let mut ledger = referrer.ledger.clone();
    earn_points(&mut ledger, points);
    let count = referral_count(&referrer.id, cli).await?;
    ledger.user_level = recompute_level(ledger.user_level, ledger.total_points_earned, count);
    save_ledger(&referrer.id, &ledger, cli).await?;
    info!(
        "referrer {} credited {} points for {}",
        referrer.id, points, user.id
    );
    Ok(())
}

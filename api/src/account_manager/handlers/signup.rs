use common::data_structures::account_manager::{AccountStatus, Eligibility, PointsLedger, UserInfo, UserRole};
use common::data_structures::referral::ReferredPoint;
use common::error_code::{AccountManagerError, BackendRes, ExternalServiceError};
use common::utils::time::now_millis;
use models::account_manager::{UserFilter, UserInfoEntity};
use models::general::get_pg_pool_connect;
use models::referral::{referral_count, ReferredPointEntity};
use models::{PgLocalCli, PsqlOp};
use tracing::{error, info};
use uuid::Uuid;

use super::UserReply;
use crate::account_manager::SignupRequest;
use crate::utils::card_number::gen_card_details;
use crate::utils::level::recompute_level;
use crate::utils::mail::{send_email, verify_email_template};
use crate::utils::otp::Otp;
use crate::utils::password::hash_password;
use crate::utils::referral::{gen_referral_link, validate_referral_code};
use crate::utils::{find_user, save_ledger, validate_email, validate_name, validate_password};

pub async fn req(request_data: SignupRequest) -> BackendRes<UserReply> {
    let SignupRequest {
        name,
        email,
        phone,
        password,
        referral_code,
    } = request_data;
    let (name, email, phone, password) = match (name, email, phone, password) {
        (Some(name), Some(email), Some(phone), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, phone, password)
        }
        _ => Err(AccountManagerError::RequiredFieldsMissing)?,
    };
    validate_name(&name)?;
    validate_email(&email)?;
    validate_password(&password)?;
    let referral_code = referral_code.filter(|code| !code.is_empty());
    if let Some(code) = &referral_code {
        validate_referral_code(code)?;
    }

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let registered = UserInfoEntity::find(UserFilter::ByEmail(&email), &mut db_cli).await?;
    if !registered.is_empty() {
        Err(AccountManagerError::EmailAlreadyRegister)?;
    }
    let referrer = match &referral_code {
        Some(code) => Some(
            find_user(
                UserFilter::ByReferralLink(code),
                AccountManagerError::ReferralCodeNotExist,
                &mut db_cli,
            )
            .await?,
        ),
        None => None,
    };

    let mut db_cli = db_cli.begin().await?;
    let user_id = Uuid::new_v4().to_string();
    let otp = Otp::issue(now_millis());
    let user = UserInfo {
        referral_link: gen_referral_link(&name, &user_id),
        id: user_id,
        name,
        email,
        phone,
        password_hash: hash_password(&password)?,
        status: AccountStatus::Pending,
        otp: Some(otp.code.clone()),
        otp_expires: Some(otp.expires_at),
        eligible: Eligibility::Unverified,
        user_role: UserRole::User,
        payment_image: None,
        card_details: gen_card_details(&mut db_cli).await?,
        referred_by: referrer.as_ref().map(|r| r.id.clone()),
        ledger: PointsLedger::default(),
    };
    UserInfoEntity::new_with_specified(user.clone())
        .insert(&mut db_cli)
        .await?;

    if let Some(referrer) = referrer {
        //placeholder entry, points arrive with the eligibility workflow
        let referrer = find_user(
            UserFilter::ByIdForUpdate(&referrer.id),
            AccountManagerError::ReferralCodeNotExist,
            &mut db_cli,
        )
        .await?;
        ReferredPointEntity::new_with_specified(ReferredPoint {
            account_id: referrer.id.clone(),
            referred_user_id: user.id.clone(),
            points: 0,
            user_details: (&user).into(),
        })
        .insert(&mut db_cli)
        .await?;
        let count = referral_count(&referrer.id, &mut db_cli).await?;
        let mut ledger = referrer.ledger.clone();
        ledger.user_level =
            recompute_level(ledger.user_level, ledger.total_points_earned, count);
        if ledger != referrer.ledger {
            save_ledger(&referrer.id, &ledger, &mut db_cli).await?;
        }
    }
    db_cli.commit().await?;
    info!("user {} signed up, waiting for email verification", user.id);

    //the account stays even if the mail can't be delivered
    send_email(
        &user.email,
        "Verify Your Email",
        verify_email_template(&user.name, &otp.code),
    )
    .await
    .map_err(|err| {
        error!("verification mail to {} failed: {}", user.email, err);
        ExternalServiceError::VerificationEmail
    })?;

    Ok(Some(UserReply { user }))
}

use std::fmt;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use common::data_structures::account_manager::{
    AccountStatus, CardDetails, CardSlot, DailyPoints, Eligibility, PointsLedger, UserInfo, UserRole,
};
use common::utils::time::parse_date;
use serde::Serialize;
use tokio_postgres::Row;

use crate::{FormatSql, PgLocalCli, PsqlOp, PsqlType};

#[derive(Clone, Debug)]
pub enum UserFilter<'b> {
    All,
    ById(&'b str),
    //row lock, only valid inside a transaction
    ByIdForUpdate(&'b str),
    ByEmail(&'b str),
    ByReferralLink(&'b str),
    ByCardNumber(CardSlot, &'b str),
}

impl fmt::Display for UserFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            UserFilter::All => "true order by created_at".to_string(),
            UserFilter::ById(id) => format!("id={}", id.string4sql()),
            UserFilter::ByIdForUpdate(id) => format!("id={} for update", id.string4sql()),
            UserFilter::ByEmail(email) => format!("email={}", email.string4sql()),
            UserFilter::ByReferralLink(link) => format!("referral_link={}", link.string4sql()),
            UserFilter::ByCardNumber(slot, number) => {
                format!("{}={}", card_column(slot), number.string4sql())
            }
        };
        write!(f, "{}", description)
    }
}

fn card_column(slot: &CardSlot) -> &'static str {
    match slot {
        CardSlot::First => "card_number1",
        CardSlot::Second => "card_number2",
        CardSlot::Third => "card_number3",
    }
}

#[derive(Debug)]
pub enum UserUpdater<'a> {
    //code, expire time in millis
    Otp(&'a str, u64),
    MarkVerified,
    PasswordHash(&'a str),
    //new hash and drop the otp that authorised it
    ResetPassword(&'a str),
    Eligible(Eligibility),
    Role(UserRole),
    PaymentImage(&'a str),
    Ledger(&'a PointsLedger),
}

impl fmt::Display for UserUpdater<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            UserUpdater::Otp(code, expires) => {
                format!("otp={},otp_expires={}", code.string4sql(), expires)
            }
            UserUpdater::MarkVerified => format!(
                "status='{}',otp=NULL,otp_expires=NULL",
                AccountStatus::Verified
            ),
            UserUpdater::PasswordHash(hash) => format!("password_hash={}", hash.string4sql()),
            UserUpdater::ResetPassword(hash) => format!(
                "password_hash={},otp=NULL,otp_expires=NULL",
                hash.string4sql()
            ),
            UserUpdater::Eligible(eligible) => format!("eligible='{}'", eligible),
            UserUpdater::Role(role) => format!("user_role='{}'", role),
            UserUpdater::PaymentImage(path) => format!("payment_image={}", path.string4sql()),
            UserUpdater::Ledger(ledger) => {
                let last_claim_date: PsqlType = ledger
                    .daily_points
                    .last_claim_date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .into();
                format!(
                    "user_level={},daily_claim_count={},last_claim_date={},daily_points={},\
                     total_points_earned={},converted_balance={}",
                    ledger.user_level,
                    ledger.daily_points.count,
                    last_claim_date.to_psql_str(),
                    ledger.daily_points.total_points,
                    ledger.total_points_earned,
                    ledger.converted_balance
                )
            }
        };
        write!(f, "{}", description)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct UserInfoEntity {
    pub user_info: UserInfo,
    pub updated_at: String,
    pub created_at: String,
}

impl UserInfoEntity {
    pub fn into_inner(self) -> UserInfo {
        self.user_info
    }

    pub fn new_with_specified(user_info: UserInfo) -> Self {
        UserInfoEntity {
            user_info,
            updated_at: "".to_string(),
            created_at: "".to_string(),
        }
    }
}

fn parse_column<T: std::str::FromStr>(row: &Row, index: usize) -> Result<T> {
    let raw = row.get::<usize, String>(index);
    raw.parse()
        .map_err(|_| anyhow!("column {} holds unknown value {}", index, raw))
}

#[async_trait]
impl PsqlOp for UserInfoEntity {
    type UpdaterContent<'a> = UserUpdater<'a>;
    type FilterContent<'b> = UserFilter<'b>;

    async fn find(
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<Vec<UserInfoEntity>> {
        let sql = format!(
            "select id,\
            name,\
            email,\
            phone,\
            password_hash,\
            status,\
            otp,\
            otp_expires,\
            eligible,\
            user_role,\
            payment_image,\
            card_number1,\
            card_number2,\
            card_number3,\
            referral_link,\
            referred_by,\
            user_level,\
            daily_claim_count,\
            cast(last_claim_date as text),\
            daily_points,\
            total_points_earned,\
            converted_balance,\
            cast(updated_at as text),\
            cast(created_at as text) \
            from users where {}",
            filter
        );
        debug!("get_users: raw sql {}", sql);
        let query_res = cli.query(sql.as_str()).await?;

        let gen_view = |row: &Row| -> Result<UserInfoEntity> {
            Ok(UserInfoEntity {
                user_info: UserInfo {
                    id: row.get(0),
                    name: row.get(1),
                    email: row.get(2),
                    phone: row.get::<usize, i64>(3),
                    password_hash: row.get(4),
                    status: parse_column(row, 5)?,
                    otp: row.get::<usize, Option<String>>(6),
                    otp_expires: row.get::<usize, Option<i64>>(7).map(|t| t as u64),
                    eligible: parse_column(row, 8)?,
                    user_role: parse_column(row, 9)?,
                    payment_image: row.get::<usize, Option<String>>(10),
                    card_details: CardDetails {
                        card_number1: row.get(11),
                        card_number2: row.get(12),
                        card_number3: row.get(13),
                    },
                    referral_link: row.get(14),
                    referred_by: row.get::<usize, Option<String>>(15),
                    ledger: PointsLedger {
                        user_level: row.get::<usize, i16>(16) as u8,
                        daily_points: DailyPoints {
                            count: row.get::<usize, i16>(17) as u8,
                            last_claim_date: row
                                .get::<usize, Option<String>>(18)
                                .as_deref()
                                .and_then(parse_date),
                            total_points: row.get::<usize, i64>(19) as u64,
                        },
                        total_points_earned: row.get::<usize, i64>(20) as u64,
                        converted_balance: row.get::<usize, i64>(21) as u64,
                    },
                },
                updated_at: row.get(22),
                created_at: row.get(23),
            })
        };
        query_res.iter().map(gen_view).collect()
    }

    async fn update(
        new_value: Self::UpdaterContent<'_>,
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<u64> {
        let sql = format!(
            "UPDATE users SET {} ,updated_at=CURRENT_TIMESTAMP where {}",
            new_value, filter
        );
        debug!("start update users {} ", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success update users {} rows", execute_res);
        Ok(execute_res)
    }

    async fn delete(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<u64> {
        let sql = format!("delete from users where {}", filter);
        debug!("start delete users {} ", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success delete users {} rows", execute_res);
        Ok(execute_res)
    }

    async fn insert(&self, cli: &mut PgLocalCli<'_>) -> Result<()> {
        let UserInfo {
            id,
            name,
            email,
            phone,
            password_hash,
            status,
            otp,
            otp_expires,
            eligible,
            user_role,
            payment_image,
            card_details,
            referral_link,
            referred_by,
            ledger,
        } = &self.user_info;
        let otp_expires: PsqlType = otp_expires.to_owned().into();
        let last_claim_date: PsqlType = ledger
            .daily_points
            .last_claim_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .into();

        let sql = format!(
            "insert into users (id,\
                name,\
                email,\
                phone,\
                password_hash,\
                status,\
                otp,\
                otp_expires,\
                eligible,\
                user_role,\
                payment_image,\
                card_number1,\
                card_number2,\
                card_number3,\
                referral_link,\
                referred_by,\
                user_level,\
                daily_claim_count,\
                last_claim_date,\
                daily_points,\
                total_points_earned,\
                converted_balance\
            ) values ({},{},{},{},{},'{}',{},{},'{}','{}',{},{},{},{},{},{},{},{},{},{},{},{});",
            id.string4sql(),
            name.string4sql(),
            email.string4sql(),
            phone,
            password_hash.string4sql(),
            status,
            otp.string4sql(),
            otp_expires.to_psql_str(),
            eligible,
            user_role,
            payment_image.string4sql(),
            card_details.card_number1.string4sql(),
            card_details.card_number2.string4sql(),
            card_details.card_number3.string4sql(),
            referral_link.string4sql(),
            referred_by.string4sql(),
            ledger.user_level,
            ledger.daily_points.count,
            last_claim_date.to_psql_str(),
            ledger.daily_points.total_points,
            ledger.total_points_earned,
            ledger.converted_balance,
        );
        debug!("row sql {} rows", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success insert {} rows", execute_res);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn sample_user(id: &str, email: &str) -> UserInfo {
        UserInfo {
            id: id.to_string(),
            name: "Ann".to_string(),
            email: email.to_string(),
            phone: 123,
            password_hash: "hash".to_string(),
            status: AccountStatus::Pending,
            otp: None,
            otp_expires: None,
            eligible: Eligibility::Unverified,
            user_role: UserRole::User,
            payment_image: None,
            card_details: CardDetails {
                card_number1: "123".to_string(),
                card_number2: "12345".to_string(),
                card_number3: "12".to_string(),
            },
            referral_link: format!("ann/referral/{}", id),
            referred_by: None,
            ledger: PointsLedger::default(),
        }
    }

    #[test]
    fn test_user_filter_sql() {
        assert_eq!(UserFilter::ById("a1").to_string(), "id='a1'");
        assert_eq!(
            UserFilter::ByIdForUpdate("a1").to_string(),
            "id='a1' for update"
        );
        assert_eq!(
            UserFilter::ByEmail("o'x@y.com").to_string(),
            "email='o''x@y.com'"
        );
        assert_eq!(
            UserFilter::ByCardNumber(CardSlot::Second, "01234").to_string(),
            "card_number2='01234'"
        );
    }

    #[test]
    fn test_user_updater_sql() {
        let ledger = PointsLedger {
            user_level: 2,
            daily_points: DailyPoints {
                count: 3,
                last_claim_date: NaiveDate::from_ymd_opt(2024, 5, 1),
                total_points: 60,
            },
            total_points_earned: 5060,
            converted_balance: 7,
        };
        assert_eq!(
            UserUpdater::Ledger(&ledger).to_string(),
            "user_level=2,daily_claim_count=3,last_claim_date='2024-05-01',daily_points=60,\
             total_points_earned=5060,converted_balance=7"
        );
        assert_eq!(
            UserUpdater::Eligible(Eligibility::Verified).to_string(),
            "eligible='verified'"
        );
        assert_eq!(
            UserUpdater::Otp("1234", 99).to_string(),
            "otp='1234',otp_expires=99"
        );
    }

    #[tokio::test]
    #[ignore = "needs the postgres instance from config_test.toml"]
    async fn test_db_user_info() {
        std::env::set_var(
            "CONFIG",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../config_test.toml"),
        );
        common::log::init_logger();
        crate::general::table_all_clear().await.unwrap();
        let mut db_cli = crate::general::get_pg_pool_connect().await.unwrap();

        let user = UserInfoEntity::new_with_specified(sample_user(
            "7f0c4b62-5b7a-4c55-9f0e-8a3c1c9c2a11",
            "a@x.com",
        ));
        user.insert(&mut db_cli).await.unwrap();
        let by_find = UserInfoEntity::find_single(UserFilter::ByEmail("a@x.com"), &mut db_cli)
            .await
            .unwrap();
        assert_eq!(by_find.user_info, user.user_info);

        UserInfoEntity::update_single(
            UserUpdater::PasswordHash("0123"),
            UserFilter::ById(&user.user_info.id),
            &mut db_cli,
        )
        .await
        .unwrap();
        let deleted = UserInfoEntity::delete(UserFilter::ById(&user.user_info.id), &mut db_cli)
            .await
            .unwrap();
        assert_eq!(deleted, 1);
    }
}

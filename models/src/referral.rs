use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use common::data_structures::referral::{ReferredPoint, ReferredUserDetails};
use serde::Serialize;
use tokio_postgres::Row;

use crate::{FormatSql, PgLocalCli, PsqlOp};

#[derive(Clone, Debug)]
pub enum ReferredPointFilter<'b> {
    ByAccountId(&'b str),
}

impl fmt::Display for ReferredPointFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ReferredPointFilter::ByAccountId(id) => format!("account_id={}", id.string4sql()),
        };
        write!(f, "{}", description)
    }
}

#[derive(Debug)]
pub enum ReferredPointUpdater {
    Points(u64),
}

impl fmt::Display for ReferredPointUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ReferredPointUpdater::Points(points) => format!("points={}", points),
        };
        write!(f, "{}", description)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ReferredPointEntity {
    pub referred_point: ReferredPoint,
    pub updated_at: String,
    pub created_at: String,
}

impl ReferredPointEntity {
    pub fn into_inner(self) -> ReferredPoint {
        self.referred_point
    }

    pub fn new_with_specified(referred_point: ReferredPoint) -> Self {
        ReferredPointEntity {
            referred_point,
            updated_at: "".to_string(),
            created_at: "".to_string(),
        }
    }
}

/// Number of entries in the account's referral list, the input of the count based level boost.
pub async fn referral_count(account_id: &str, cli: &mut PgLocalCli<'_>) -> Result<u64> {
    let sql = format!(
        "select count(1) from referred_points where account_id={}",
        account_id.string4sql()
    );
    let rows = cli.query(sql.as_str()).await?;
    let count = rows
        .first()
        .map(|row| row.get::<usize, i64>(0) as u64)
        .unwrap_or(0);
    Ok(count)
}

#[async_trait]
impl PsqlOp for ReferredPointEntity {
    type UpdaterContent<'a> = ReferredPointUpdater;
    type FilterContent<'b> = ReferredPointFilter<'b>;

    async fn find(
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<Vec<ReferredPointEntity>> {
        let sql = format!(
            "select account_id,\
            referred_user_id,\
            points,\
            user_name,\
            user_email,\
            user_level,\
            user_total_points_earned,\
            user_referral_link,\
            cast(updated_at as text),\
            cast(created_at as text) \
            from referred_points where {} order by id",
            filter
        );
        let query_res = cli.query(sql.as_str()).await?;
        debug!("get referred_points: raw sql {}", sql);

        let gen_view = |row: &Row| ReferredPointEntity {
            referred_point: ReferredPoint {
                account_id: row.get(0),
                referred_user_id: row.get(1),
                points: row.get::<usize, i64>(2) as u64,
                user_details: ReferredUserDetails {
                    name: row.get(3),
                    email: row.get(4),
                    user_level: row.get::<usize, i16>(5) as u8,
                    total_points_earned: row.get::<usize, i64>(6) as u64,
                    referral_link: row.get(7),
                },
            },
            updated_at: row.get(8),
            created_at: row.get(9),
        };
        Ok(query_res.iter().map(gen_view).collect())
    }

    async fn update(
        new_value: Self::UpdaterContent<'_>,
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<u64> {
        let sql = format!(
            "update referred_points set {} ,updated_at=CURRENT_TIMESTAMP where {}",
            new_value, filter
        );
        debug!("start update referred_points {} ", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success update referred_points {} rows", execute_res);
        Ok(execute_res)
    }

    async fn delete(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<u64> {
        let sql = format!("delete from referred_points where {}", filter);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success delete referred_points {} rows", execute_res);
        Ok(execute_res)
    }

    async fn insert(&self, cli: &mut PgLocalCli<'_>) -> Result<()> {
        let ReferredPoint {
            account_id,
            referred_user_id,
            points,
            user_details,
        } = &self.referred_point;

        let sql = format!(
            "insert into referred_points (account_id,\
            referred_user_id,\
            points,\
            user_name,\
            user_email,\
            user_level,\
            user_total_points_earned,\
            user_referral_link\
            ) values ({},{},{},{},{},{},{},{});",
            account_id.string4sql(),
            referred_user_id.string4sql(),
            points,
            user_details.name.string4sql(),
            user_details.email.string4sql(),
            user_details.user_level,
            user_details.total_points_earned,
            user_details.referral_link.string4sql(),
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

    #[test]
    fn test_referred_point_filter_sql() {
        assert_eq!(
            ReferredPointFilter::ByAccountId("u1").to_string(),
            "account_id='u1'"
        );
        assert_eq!(ReferredPointUpdater::Points(0).to_string(), "points=0");
    }
}

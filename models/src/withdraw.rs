use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use common::data_structures::withdraw::{WithdrawRequest, WithdrawStatus};
use serde::Serialize;
use tokio_postgres::Row;

use crate::{FormatSql, PgLocalCli, PsqlOp};

#[derive(Clone, Debug)]
pub enum WithdrawFilter<'b> {
    All,
    ById(&'b str),
    ByIdForUpdate(&'b str),
}

impl fmt::Display for WithdrawFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            WithdrawFilter::All => "true order by created_at".to_string(),
            WithdrawFilter::ById(id) => format!("id={}", id.string4sql()),
            WithdrawFilter::ByIdForUpdate(id) => format!("id={} for update", id.string4sql()),
        };
        write!(f, "{}", description)
    }
}

#[derive(Debug)]
pub enum WithdrawUpdater {
    Status(WithdrawStatus),
}

impl fmt::Display for WithdrawUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            WithdrawUpdater::Status(status) => format!("status='{}'", status),
        };
        write!(f, "{}", description)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct WithdrawRequestEntity {
    pub withdraw_request: WithdrawRequest,
    pub updated_at: String,
    pub created_at: String,
}

impl WithdrawRequestEntity {
    pub fn into_inner(self) -> WithdrawRequest {
        self.withdraw_request
    }

    pub fn new_with_specified(withdraw_request: WithdrawRequest) -> Self {
        WithdrawRequestEntity {
            withdraw_request,
            updated_at: "".to_string(),
            created_at: "".to_string(),
        }
    }
}

#[async_trait]
impl PsqlOp for WithdrawRequestEntity {
    type UpdaterContent<'a> = WithdrawUpdater;
    type FilterContent<'b> = WithdrawFilter<'b>;

    async fn find(
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<Vec<WithdrawRequestEntity>> {
        let sql = format!(
            "select id,user_id,amount,status,cast(updated_at as text),cast(created_at as text) \
            from withdraw_requests where {}",
            filter
        );
        let query_res = cli.query(sql.as_str()).await?;
        debug!("get withdraw_requests: raw sql {}", sql);

        let gen_view = |row: &Row| -> Result<WithdrawRequestEntity> {
            let status: String = row.get(3);
            Ok(WithdrawRequestEntity {
                withdraw_request: WithdrawRequest {
                    id: row.get(0),
                    user_id: row.get(1),
                    amount: row.get::<usize, i64>(2) as u64,
                    status: status.parse()?,
                },
                updated_at: row.get(4),
                created_at: row.get(5),
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
            "update withdraw_requests set {} ,updated_at=CURRENT_TIMESTAMP where {}",
            new_value, filter
        );
        debug!("start update withdraw_requests {} ", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success update withdraw_requests {} rows", execute_res);
        Ok(execute_res)
    }

    async fn delete(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<u64> {
        let sql = format!("delete from withdraw_requests where {}", filter);
        let execute_res = cli.execute(sql.as_str()).await?;
        Ok(execute_res)
    }

    async fn insert(&self, cli: &mut PgLocalCli<'_>) -> Result<()> {
        let WithdrawRequest {
            id,
            user_id,
            amount,
            status,
        } = &self.withdraw_request;
        let sql = format!(
            "insert into withdraw_requests (id,user_id,amount,status) values ({},{},{},'{}');",
            id.string4sql(),
            user_id.string4sql(),
            amount,
            status
        );
        debug!("row sql {} rows", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success insert {} rows", execute_res);
        Ok(())
    }
}

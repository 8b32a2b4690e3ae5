use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use common::data_structures::feedback::Feedback;
use serde::Serialize;
use tokio_postgres::Row;

use crate::{FormatSql, PgLocalCli, PsqlOp};

#[derive(Clone, Debug)]
pub enum FeedbackFilter<'b> {
    ByUserId(&'b str),
}

impl fmt::Display for FeedbackFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            FeedbackFilter::ByUserId(id) => format!("user_id={}", id.string4sql()),
        };
        write!(f, "{}", description)
    }
}

//feedback is replaced, never edited
#[derive(Debug)]
pub enum FeedbackUpdater<'a> {
    Content(&'a str),
}

impl fmt::Display for FeedbackUpdater<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            FeedbackUpdater::Content(content) => format!("content={}", content.string4sql()),
        };
        write!(f, "{}", description)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct FeedbackEntity {
    pub feedback: Feedback,
    pub updated_at: String,
    pub created_at: String,
}

impl FeedbackEntity {
    pub fn into_inner(self) -> Feedback {
        self.feedback
    }

    pub fn new_with_specified(feedback: Feedback) -> Self {
        FeedbackEntity {
            feedback,
            updated_at: "".to_string(),
            created_at: "".to_string(),
        }
    }
}

#[async_trait]
impl PsqlOp for FeedbackEntity {
    type UpdaterContent<'a> = FeedbackUpdater<'a>;
    type FilterContent<'b> = FeedbackFilter<'b>;

    async fn find(
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<Vec<FeedbackEntity>> {
        let sql = format!(
            "select id,user_id,content,cast(updated_at as text),cast(created_at as text) \
            from feedback where {}",
            filter
        );
        let query_res = cli.query(sql.as_str()).await?;
        debug!("get feedback: raw sql {}", sql);

        let gen_view = |row: &Row| FeedbackEntity {
            feedback: Feedback {
                id: row.get(0),
                user_id: row.get(1),
                content: row.get(2),
            },
            updated_at: row.get(3),
            created_at: row.get(4),
        };
        Ok(query_res.iter().map(gen_view).collect())
    }

    async fn update(
        new_value: Self::UpdaterContent<'_>,
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<u64> {
        let sql = format!(
            "update feedback set {} ,updated_at=CURRENT_TIMESTAMP where {}",
            new_value, filter
        );
        debug!("start update feedback {} ", sql);
        let execute_res = cli.execute(sql.as_str()).await?;
        Ok(execute_res)
    }

    async fn delete(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<u64> {
        let sql = format!("delete from feedback where {}", filter);
        let execute_res = cli.execute(sql.as_str()).await?;
        debug!("success delete feedback {} rows", execute_res);
        Ok(execute_res)
    }

    async fn insert(&self, cli: &mut PgLocalCli<'_>) -> Result<()> {
        let Feedback {
            id,
            user_id,
            content,
        } = &self.feedback;
        let sql = format!(
            "insert into feedback (id,user_id,content) values ({},{},{});",
            id.string4sql(),
            user_id.string4sql(),
            content.string4sql()
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
    fn test_feedback_sql() {
        assert_eq!(FeedbackFilter::ByUserId("u1").to_string(), "user_id='u1'");
        assert_eq!(
            FeedbackUpdater::Content("it's fine").to_string(),
            "content='it''s fine'"
        );
    }
}

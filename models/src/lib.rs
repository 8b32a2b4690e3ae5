//! encapsulation of some postgresql interface for easy call

pub mod account_manager;
pub mod feedback;
pub mod general;
pub mod referral;
pub mod withdraw;

#[macro_use]
extern crate tracing;
#[macro_use]
extern crate lazy_static;

use anyhow::Result;
use async_trait::async_trait;
use deadpool::managed::Object;
use deadpool_postgres::Manager;
use deadpool_postgres::Transaction;
use std::fmt::Display;
use thiserror::Error;
use tokio_postgres::Row;

type LocalConn = Object<Manager>;

#[derive(Error, Debug, PartialEq)]
pub enum DBError {
    #[error("DBError::DataNotFound: data isn't existed")]
    DataNotFound,
    #[error("DBError::RepeatedData: data is repeated")]
    RepeatedData,
    #[error("DBError::ConnectionIsNotTransaction: commit on a plain connection")]
    ConnectionIsNotTransaction,
    #[error("DBError::AlreadyInTransaction: nested transaction")]
    AlreadyInTransaction,
}

/// True when the error came from `find_single`/`update_single` missing its row.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<DBError>(), Some(DBError::DataNotFound))
}

pub enum PgLocalCli<'a> {
    Conn(LocalConn),
    Trans(Transaction<'a>),
}

impl PgLocalCli<'_> {
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        let line = match self {
            PgLocalCli::Conn(c) => c.execute(sql, &[]).await?,
            PgLocalCli::Trans(t) => t.execute(sql, &[]).await?,
        };
        Ok(line)
    }
    pub async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let row = match self {
            PgLocalCli::Conn(c) => c.query(sql, &[]).await?,
            PgLocalCli::Trans(t) => t.query(sql, &[]).await?,
        };
        Ok(row)
    }
    pub async fn commit(self) -> Result<()> {
        match self {
            PgLocalCli::Conn(_c) => Err(DBError::ConnectionIsNotTransaction.into()),
            PgLocalCli::Trans(t) => Ok(t.commit().await?),
        }
    }

    pub async fn begin(&mut self) -> Result<PgLocalCli<'_>> {
        match self {
            PgLocalCli::Conn(c) => {
                let trans = c.transaction().await?;
                Ok(PgLocalCli::Trans(trans))
            }
            PgLocalCli::Trans(_t) => Err(DBError::AlreadyInTransaction.into()),
        }
    }
}

impl<'a> From<LocalConn> for PgLocalCli<'a> {
    fn from(value: LocalConn) -> Self {
        Self::Conn(value)
    }
}

impl<'a> From<Transaction<'a>> for PgLocalCli<'a> {
    fn from(value: Transaction<'a>) -> Self {
        Self::Trans(value)
    }
}

#[async_trait]
pub trait PsqlOp {
    type UpdaterContent<'a>: Display + Send;
    type FilterContent<'b>: Display + Send;

    async fn find(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<Vec<Self>>
    where
        Self: Sized + Send;
    async fn find_single(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<Self>
    where
        Self: Sized + Send,
    {
        let mut get_res: Vec<Self> = Self::find(filter, cli).await?;
        let data_len = get_res.len();
        if data_len == 0 {
            debug!("{}", DBError::DataNotFound);
            Err(DBError::DataNotFound.into())
        } else if data_len > 1 {
            error!("{}", DBError::RepeatedData);
            Err(DBError::RepeatedData.into())
        } else {
            get_res.pop().ok_or_else(|| DBError::DataNotFound.into())
        }
    }

    async fn delete(filter: Self::FilterContent<'_>, cli: &mut PgLocalCli<'_>) -> Result<u64>;

    async fn update(
        new_value: Self::UpdaterContent<'_>,
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<u64>;

    async fn update_single(
        new_value: Self::UpdaterContent<'_>,
        filter: Self::FilterContent<'_>,
        cli: &mut PgLocalCli<'_>,
    ) -> Result<()>
    where
        Self: Sized + Send,
    {
        let row_num = Self::update(new_value, filter, cli).await?;
        if row_num == 0 {
            debug!("{}", DBError::DataNotFound);
            Err(DBError::DataNotFound.into())
        } else if row_num > 1 {
            error!("{}", DBError::RepeatedData);
            Err(DBError::RepeatedData.into())
        } else {
            Ok(())
        }
    }

    async fn insert(&self, cli: &mut PgLocalCli<'_>) -> Result<()>;
}

/// Quote a value as a sql string literal.
pub trait FormatSql {
    fn string4sql(&self) -> String;
}

impl FormatSql for str {
    fn string4sql(&self) -> String {
        format!("'{}'", self.replace('\'', "''"))
    }
}

impl FormatSql for String {
    fn string4sql(&self) -> String {
        self.as_str().string4sql()
    }
}

impl<T: AsRef<str>> FormatSql for Option<T> {
    fn string4sql(&self) -> String {
        match self {
            Some(value) => value.as_ref().string4sql(),
            None => "NULL".to_string(),
        }
    }
}

pub enum PsqlType {
    OptionStr(Option<String>),
    OptionU64(Option<u64>),
}

impl PsqlType {
    pub fn to_psql_str(&self) -> String {
        match self {
            PsqlType::OptionStr(data) => data.string4sql(),
            PsqlType::OptionU64(data) => {
                data.map(|x| format!("{}", x)).unwrap_or("NULL".to_string())
            }
        }
    }
}

impl From<Option<String>> for PsqlType {
    fn from(value: Option<String>) -> Self {
        PsqlType::OptionStr(value)
    }
}

impl From<Option<u64>> for PsqlType {
    fn from(value: Option<u64>) -> Self {
        PsqlType::OptionU64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sql_escape() {
        assert_eq!("ann".string4sql(), "'ann'");
        assert_eq!("o'neil".string4sql(), "'o''neil'");
        assert_eq!("x'; drop table users; --".to_string().string4sql(), "'x''; drop table users; --'");
        assert_eq!(None::<String>.string4sql(), "NULL");
        assert_eq!(Some("a").string4sql(), "'a'");
    }

    #[test]
    fn test_psql_type() {
        assert_eq!(PsqlType::from(None::<u64>).to_psql_str(), "NULL");
        assert_eq!(PsqlType::from(Some(12u64)).to_psql_str(), "12");
        assert_eq!(
            PsqlType::from(Some("it's".to_string())).to_psql_str(),
            "'it''s'"
        );
    }

    #[test]
    fn test_is_not_found() {
        let err: anyhow::Error = DBError::DataNotFound.into();
        assert!(is_not_found(&err));
        let err: anyhow::Error = DBError::RepeatedData.into();
        assert!(!is_not_found(&err));
        assert!(!is_not_found(&anyhow::anyhow!("DBError::DataNotFound")));
    }
}

use anyhow::Result;
use common::constants::PG_POOL_SIZE;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod};
use tokio_postgres::NoTls;

use crate::PgLocalCli;

lazy_static! {
    static ref PG_POOL: Pool = connect_pool().expect("create postgres pool failed");
}

fn connect_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.dbname = Some(common::env::CONF.database.dbname.clone());
    cfg.user = Some(common::env::CONF.database.user.clone());
    cfg.password = Some(common::env::CONF.database.password.clone());
    cfg.host = Some(common::env::CONF.database.host.clone());
    cfg.port = Some(common::env::CONF.database.port as u16);

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(PG_POOL_SIZE));
    let pool = cfg.create_pool(None, NoTls)?;
    Ok(pool)
}

pub async fn get_pg_pool_connect<'a>() -> Result<PgLocalCli<'a>> {
    let conn = PG_POOL.get().await?;
    Ok(PgLocalCli::Conn(conn))
}

pub async fn table_clear(table_name: &str, cli: &mut PgLocalCli<'_>) -> Result<()> {
    let sql = format!("truncate table {} restart identity cascade", table_name);
    cli.execute(sql.as_str()).await?;
    Ok(())
}

pub async fn table_all_clear() -> Result<()> {
    let mut cli = get_pg_pool_connect().await?;
    for table in ["referred_points", "feedback", "withdraw_requests", "users"] {
        table_clear(table, &mut cli).await?;
    }
    Ok(())
}

//! Database utility commands.

use sqlx::PgPool;

/// `db ping`: verify the pool can reach Postgres.
pub(crate) async fn run_ping(pool: &PgPool) -> anyhow::Result<()> {
    postloom_db::health_check(pool).await?;
    println!("database ok");
    Ok(())
}

/// `db migrate`: apply any pending migrations.
pub(crate) async fn run_migrate(pool: &PgPool) -> anyhow::Result<()> {
    let applied = postloom_db::run_migrations(pool).await?;
    if applied == 0 {
        println!("no pending migrations");
    } else {
        println!("applied {applied} migrations");
    }
    Ok(())
}

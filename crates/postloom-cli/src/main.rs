mod briefs;
mod db;
mod generate;
mod publish;


use clap::{CommandFactory, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "postloom-cli")]
#[command(about = "Postloom operational command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run one campaign brief through the generation pipeline
    Generate {
        /// Public id of the brand to generate for
        #[arg(long)]
        brand: Uuid,

        /// Campaign topic
        #[arg(long)]
        topic: String,

        /// Campaign goal (defaults to an engagement goal)
        #[arg(long)]
        goal: Option<String>,

        /// Call to action to weave into the copy
        #[arg(long)]
        cta: Option<String>,

        /// Act as this user id (defaults to the nil user)
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Claim and deliver one batch of ready posts
    Publish {
        /// Maximum number of posts to claim (defaults to the configured batch size)
        #[arg(long)]
        batch_size: Option<i64>,

        /// Skip the simulated delivery delay
        #[arg(long)]
        no_delay: bool,
    },
    /// List recent briefs with their status and post counts
    Briefs {
        /// Maximum number of briefs to show
        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Act as this user id (defaults to the nil user)
        #[arg(long)]
        user: Option<Uuid>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_long_help()?;
        return Ok(());
    };

    let config = postloom_core::load_app_config()?;
    let pool_config = postloom_db::PoolConfig::from_app_config(&config);
    let pool = postloom_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_ping(&pool).await,
            DbCommands::Migrate => db::run_migrate(&pool).await,
        },
        Commands::Generate {
            brand,
            topic,
            goal,
            cta,
            user,
        } => {
            let request = postloom_pipeline::BriefRequest {
                brand_id: brand,
                topic,
                goal,
                cta,
            };
            generate::run_generate(&pool, &config, user.unwrap_or_else(Uuid::nil), request).await
        }
        Commands::Publish {
            batch_size,
            no_delay,
        } => publish::run_publish(&pool, &config, batch_size, no_delay).await,
        Commands::Briefs { limit, user } => {
            briefs::run_briefs(&pool, user.unwrap_or_else(Uuid::nil), limit).await
        }
    }
}

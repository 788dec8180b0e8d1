use clap::Parser;

use imperial_portfolio::cli::{Cli, Commands};
use imperial_portfolio::config::{get_config, init_config_from};
use imperial_portfolio::runtime::modes::{run_cli, run_server};
use imperial_portfolio::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            // guard 必须存活到进程结束，保证日志刷盘
            let _guard = init_logging(&config.logging)?;
            run_server(&config).await
        }
        Some(cmd) => {
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

use krebstats::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    krebstats::init_logging(log::LevelFilter::Info);

    let config = AppConfig::from_env()?;
    krebstats::run_server(config).await?;
    Ok(())
}

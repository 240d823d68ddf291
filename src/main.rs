use storefront_commerce::commands::run_custom_commands;
use storefront_commerce::configuration::get_configuration;
use storefront_commerce::startup::Application;
use storefront_commerce::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("storefront".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        run_custom_commands(args).await?;
        return Ok(());
    }

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}

use dotenvy::dotenv;
use elasticsearch::http::transport::Transport;
use elasticsearch::Elasticsearch;
use feeder_upgrade::config::Config;
use feeder_upgrade::elastic::index_definition_loader::IndexDefinitionLoader;
use feeder_upgrade::IndexRepository;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::error::Error;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional, the environment itself is enough
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feeder_upgrade=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let mut options = config.options.clone();

    if let Some(directory) = &config.definitions_directory {
        let index_definition_loader = IndexDefinitionLoader::new(directory, options.prefix.as_str());
        let index_definition = index_definition_loader.get_definition(&config.index_name);

        options.mapping = Some(index_definition_loader.load_mapping(&index_definition).await?);
        if let Some(synonyms) = index_definition_loader.load_synonyms(&index_definition).await? {
            options.synonyms = Some(synonyms);
        }
    }

    let transport = Transport::single_node(&config.elasticsearch_url)?;
    let index_repository = IndexRepository::new(Elasticsearch::new(transport));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.set_message(format!("Upgrading '{}'", config.index_name));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    let result = feeder_upgrade::upgrade(&index_repository, &config.index_name, options).await;
    spinner.finish_and_clear();
    let effective_options = match result {
        Ok(effective_options) => effective_options,
        Err(upgrade_error) if upgrade_error.is_store_error() => {
            error!("Elasticsearch rejected the upgrade of '{}'", config.index_name);
            return Err(upgrade_error.into());
        }
        Err(upgrade_error) => {
            error!("Nothing was changed, the upgrade input for '{}' is invalid", config.index_name);
            return Err(upgrade_error.into());
        }
    };

    info!(
        "Upgraded '{}' to version {:?} in {}",
        config.index_name,
        effective_options.target_version,
        HumanDuration(started.elapsed())
    );
    println!("{}", serde_json::to_string_pretty(&effective_options)?);

    Ok(())
}

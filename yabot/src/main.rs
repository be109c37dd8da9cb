use argh::FromArgs;
use miette::WrapErr;
use tracing::{info, warn};

use yabot::{Config, Yabot, consts};

/// IRC bot that reports the crawl rate of a YaCy peer
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(option, default = "String::from(consts::DEFAULT_CONFIG_PATH)")]
    config_path: String,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let opts: Opts = argh::from_env();

    let config = Config::load(&opts.config_path)
        .map_err(yabot::Error::from)
        .wrap_err_with(|| format!("loading {}", opts.config_path))?;

    yabot::tracing::try_init(&config.tracing)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %opts.config_path,
        "starting"
    );

    let bot = Yabot::new(config)?;
    let result = bot.run().await.wrap_err("running bot");

    warn!("the bot stopped running");

    result
}

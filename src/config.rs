//! Command-line and environment configuration.
//!
//! Everything is parsed once in `main` and handed to the collaborators that
//! need it; nothing else reads the process environment.

use crate::domain::Group;
use crate::errors::TrackerError;
use crate::inventory::InventoryQuery;
use crate::store::StoreBackend;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const INVENTORY_URL: &str = "https://www.tesla.com/inventory/api/v4/inventory-results";
const SITE_URL: &str = "https://www.tesla.com";

/// Watches the used-vehicle inventory and posts new and changed listings to Discord
#[derive(Parser, Debug)]
#[command(name = "inventory_watch")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Model code to query (e.g. m3, my)
    #[arg(long, env = "MODEL", default_value = "m3")]
    pub model: String,

    /// Model years, comma separated
    #[arg(long, env = "YEARS", value_delimiter = ',', default_values_t = vec![2024, 2025])]
    pub years: Vec<i32>,

    /// Trim codes, comma separated
    #[arg(
        long,
        env = "TRIMS",
        value_delimiter = ',',
        default_values_t = vec!["LRRWD".to_string(), "LRAWD".to_string()]
    )]
    pub trims: Vec<String>,

    /// Inventory market
    #[arg(long, default_value = "GB")]
    pub market: String,

    /// new or used
    #[arg(long, default_value = "used")]
    pub condition: String,

    /// Site locale used in listing links
    #[arg(long, default_value = "en_GB")]
    pub language: String,

    /// Symbol prefixed to prices in notifications
    #[arg(long, default_value = "£")]
    pub currency_symbol: String,

    /// Inventory endpoint
    #[arg(long, default_value = INVENTORY_URL)]
    pub inventory_url: String,

    /// Discord webhook receiving notifications
    #[arg(long, env = "DISCORD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Thread id for new listings
    #[arg(long, env = "DISCORD_NEW_CAR_THREAD")]
    pub new_thread: Option<String>,

    /// Thread id for changed listings
    #[arg(long, env = "DISCORD_CHANGED_CAR_THREAD")]
    pub changed_thread: Option<String>,

    /// Where the snapshot of known listings is kept
    #[arg(long, default_value = "cars.json")]
    pub store: PathBuf,

    /// Snapshot storage format
    #[arg(long, value_enum, default_value_t = StoreBackend::Json)]
    pub backend: StoreBackend,

    /// Log notifications instead of sending them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Keep running, starting a new cycle this many seconds after the last one ended
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub endpoint: String,
    pub query: InventoryQuery,
    /// Site root listing links hang off, e.g. `https://www.tesla.com/en_GB`.
    pub link_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: Url,
    pub new_thread: Option<String>,
    pub changed_thread: Option<String>,
    pub currency_symbol: String,
}

impl DiscordConfig {
    pub fn thread_for(&self, group: Group) -> Option<&str> {
        match group {
            Group::New => self.new_thread.as_deref(),
            Group::Changed => self.changed_thread.as_deref(),
        }
    }

    /// Webhook URL with `thread_id` set for the group, when it has a thread.
    pub fn target_url(&self, group: Group) -> Url {
        let mut url = self.webhook_url.clone();
        if let Some(thread) = self.thread_for(group).filter(|t| !t.is_empty()) {
            url.query_pairs_mut().append_pair("thread_id", thread);
        }
        url
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub inventory: InventoryConfig,
    /// `None` in dry-run mode.
    pub discord: Option<DiscordConfig>,
    pub currency_symbol: String,
    pub store_path: PathBuf,
    pub backend: StoreBackend,
    pub interval: Option<Duration>,
    pub timeout: Duration,
}

impl TryFrom<Args> for Config {
    type Error = TrackerError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.years.is_empty() {
            return Err(TrackerError::Config("at least one model year is required".into()));
        }
        let trims: Vec<String> = args
            .trims
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let timeout = Duration::from_secs(args.timeout_secs);

        let discord = if args.dry_run {
            None
        } else {
            let raw = args.webhook_url.ok_or_else(|| {
                TrackerError::Config(
                    "DISCORD_WEBHOOK_URL (or --webhook-url) is required unless --dry-run is set"
                        .into(),
                )
            })?;
            let webhook_url = Url::parse(&raw)
                .map_err(|e| TrackerError::Config(format!("invalid webhook url: {e}")))?;

            Some(DiscordConfig {
                webhook_url,
                new_thread: args.new_thread,
                changed_thread: args.changed_thread,
                currency_symbol: args.currency_symbol.clone(),
            })
        };

        Ok(Config {
            inventory: InventoryConfig {
                endpoint: args.inventory_url,
                query: InventoryQuery::new(
                    &args.model,
                    &args.condition,
                    &args.market,
                    args.years,
                    trims,
                ),
                link_base: format!("{SITE_URL}/{}", args.language),
                timeout,
            },
            discord,
            currency_symbol: args.currency_symbol,
            store_path: args.store,
            backend: args.backend,
            interval: args.interval_secs.map(Duration::from_secs),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, TrackerError> {
        let args = Args::try_parse_from(std::iter::once("inventory_watch").chain(argv.iter().copied()))
            .expect("args parse");
        Config::try_from(args)
    }

    #[test]
    fn dry_run_needs_no_webhook() {
        let config = parse(&["--dry-run"]).unwrap();
        assert!(config.discord.is_none());
        assert_eq!(config.inventory.link_base, "https://www.tesla.com/en_GB");
        assert_eq!(config.backend, StoreBackend::Json);
    }

    #[test]
    fn splits_years_and_trims() {
        let config = parse(&[
            "--dry-run",
            "--years",
            "2023,2024",
            "--trims",
            "LRAWD, PAWD",
            "--model",
            "my",
        ])
        .unwrap();

        let q = &config.inventory.query;
        assert_eq!(q.model, "my");
        assert_eq!(q.options.year, vec![2023, 2024]);
        assert_eq!(q.options.trim, vec!["LRAWD", "PAWD"]);
    }

    #[test]
    fn rejects_bad_webhook_url() {
        let err = parse(&["--webhook-url", "not a url"]).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn thread_ids_route_by_group() {
        let config = parse(&[
            "--webhook-url",
            "https://discord.com/api/webhooks/1/abc",
            "--new-thread",
            "111",
            "--changed-thread",
            "222",
        ])
        .unwrap();
        let discord = config.discord.unwrap();

        assert_eq!(
            discord.target_url(Group::New).as_str(),
            "https://discord.com/api/webhooks/1/abc?thread_id=111"
        );
        assert_eq!(
            discord.target_url(Group::Changed).as_str(),
            "https://discord.com/api/webhooks/1/abc?thread_id=222"
        );
    }

    #[test]
    fn missing_thread_posts_to_channel() {
        let config = parse(&["--webhook-url", "https://discord.com/api/webhooks/1/abc"]).unwrap();
        let discord = config.discord.unwrap();
        assert_eq!(
            discord.target_url(Group::New).as_str(),
            "https://discord.com/api/webhooks/1/abc"
        );
    }
}

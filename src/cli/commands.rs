use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::adb::AdbShell;
use crate::config::{
    LauncherKind, SourceKind, WhatsapperConfig, default_config_path, load_config,
    load_config_from_path,
};
use crate::dispatch::{
    AdbLauncher, Launcher, PhoneDispatcher, SystemLauncher, is_valid, native_link, normalize,
    web_link,
};
use crate::models::{CallRecord, CallType, DispatchStrategy};
use crate::reader::{
    AdbCallLogSource, AdbContactsSource, CallLogReader, CallLogSource, ContactDirectory,
    ContactsSource, ContentQueryCallLogSource, HistoryState, JsonlCallLogSource, ReaderOptions,
};
use crate::utils::{format_age, format_duration, format_path_with_tilde, strip_ansi_codes};

const NO_PERMISSION_MESSAGE: &str = "Permission required to access call history";
const EMPTY_HISTORY_MESSAGE: &str = "No call history found";

#[derive(Parser)]
#[command(name = "whatsapper")]
#[command(version = "0.1.0")]
#[command(about = "Browse the phone's call history and open WhatsApp chats", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Device serial passed to adb
    #[arg(long, global = true)]
    pub serial: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Where to read the call history from
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Call-log export (implies a file source)
    #[arg(long)]
    pub call_log: Option<PathBuf>,

    /// Contacts export used to fill in missing names
    #[arg(long)]
    pub contacts: Option<PathBuf>,

    /// Show every call instead of the latest one per number
    #[arg(long)]
    pub keep_duplicates: bool,

    /// Do not look up contact names
    #[arg(long)]
    pub no_contacts: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct DispatchArgs {
    /// Skip the installed-app check and open WhatsApp Web directly
    #[arg(long)]
    pub web_only: bool,

    /// How chat links are opened
    #[arg(long, value_enum)]
    pub launcher: Option<LauncherKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the call history, newest first
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Open a WhatsApp chat with a phone number
    Open {
        number: String,

        #[command(flatten)]
        dispatch: DispatchArgs,
    },
    /// Open a WhatsApp chat with the N-th entry of `list`
    Pick {
        /// Position as printed by `list` (starting at 1)
        index: usize,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        dispatch: DispatchArgs,
    },
    /// Show how a phone number is cleaned up and whether it is accepted
    Check { number: String },
    /// Show statistics about the call history
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    super::init_logging(cli.verbose);
    execute(cli)
}

pub fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", format_path_with_tilde(path)))?,
        None => load_config().context("Failed to load configuration")?,
    };
    if let Some(serial) = cli.serial {
        config.adb.serial = Some(serial);
    }

    match command {
        Commands::List { source, json, limit } => {
            apply_source_args(&mut config, &source);
            list_history(&config, json, limit)
        }
        Commands::Open { number, dispatch } => {
            apply_dispatch_args(&mut config, &dispatch);
            open_chat(&config, &number)
        }
        Commands::Pick { index, source, dispatch } => {
            apply_source_args(&mut config, &source);
            apply_dispatch_args(&mut config, &dispatch);
            pick_entry(&config, index)
        }
        Commands::Check { number } => check_number(&number),
        Commands::Stats { source } => {
            apply_source_args(&mut config, &source);
            show_stats(&config)
        }
    }
}

fn apply_source_args(config: &mut WhatsapperConfig, args: &SourceArgs) {
    if let Some(path) = &args.call_log {
        config.source.call_log_path = Some(path.clone());
        if config.source.kind == SourceKind::Adb {
            config.source.kind = SourceKind::Jsonl;
        }
    }
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(path) = &args.contacts {
        config.source.contacts_path = Some(path.clone());
    }
    if args.keep_duplicates {
        config.reader.deduplicate = false;
    }
    if args.no_contacts {
        config.permissions.contacts = false;
    }
}

fn apply_dispatch_args(config: &mut WhatsapperConfig, args: &DispatchArgs) {
    if args.web_only {
        config.dispatch.strategy = DispatchStrategy::WebOnly;
    }
    if let Some(launcher) = args.launcher {
        config.dispatch.launcher = launcher;
    }
}

fn adb_shell(config: &WhatsapperConfig) -> AdbShell {
    AdbShell::new(&config.adb.path, config.adb.serial.clone())
}

/// Call-log and contacts sources selected by the configuration
struct HistorySources {
    calls: Box<dyn CallLogSource>,
    contacts: Option<Box<dyn ContactsSource>>,
}

fn build_sources(config: &WhatsapperConfig) -> Result<HistorySources> {
    if config.source.kind == SourceKind::Adb {
        return Ok(HistorySources {
            calls: Box::new(AdbCallLogSource::new(adb_shell(config))),
            contacts: Some(Box::new(AdbContactsSource::new(adb_shell(config)))),
        });
    }

    let call_log_path = config
        .source
        .call_log_path
        .clone()
        .ok_or_else(|| anyhow!("No call log file configured (set source.call_log_path or pass --call-log)"))?;

    let calls: Box<dyn CallLogSource> = match config.source.kind {
        SourceKind::ContentQuery => Box::new(ContentQueryCallLogSource::new(call_log_path)),
        _ => Box::new(JsonlCallLogSource::new(call_log_path)),
    };

    // Contacts are only read when they may be used
    let contacts = match (&config.source.contacts_path, config.permissions.contacts) {
        (Some(path), true) => {
            let loaded = match config.source.kind {
                SourceKind::ContentQuery => ContactDirectory::from_dump_file(path),
                _ => ContactDirectory::from_jsonl_file(path),
            };
            match loaded {
                Ok(directory) => Some(Box::new(directory) as Box<dyn ContactsSource>),
                Err(e) => {
                    warn!("Contact names unavailable: {:#}", e);
                    None
                }
            }
        }
        _ => None,
    };

    Ok(HistorySources { calls, contacts })
}

fn load_history(config: &WhatsapperConfig) -> Result<HistoryState> {
    let sources = build_sources(config)?;
    let mut reader = CallLogReader::new(sources.calls.as_ref())
        .with_options(ReaderOptions { deduplicate: config.reader.deduplicate });
    if let Some(contacts) = &sources.contacts {
        reader = reader.with_contacts(contacts.as_ref());
    }
    Ok(reader.refresh(&config.permissions))
}

fn build_launcher(config: &WhatsapperConfig) -> Box<dyn Launcher> {
    match config.dispatch.launcher {
        LauncherKind::Adb => Box::new(AdbLauncher::new(adb_shell(config))),
        LauncherKind::System => Box::new(SystemLauncher),
    }
}

/// The system launcher has no Android apps to check, so it always goes straight to the web
fn effective_strategy(config: &WhatsapperConfig) -> DispatchStrategy {
    match (config.dispatch.launcher, config.dispatch.strategy) {
        (LauncherKind::System, DispatchStrategy::NativeFirst) => {
            info!("System launcher selected, opening WhatsApp Web");
            DispatchStrategy::WebOnly
        }
        (_, strategy) => strategy,
    }
}

fn dispatch_number(config: &WhatsapperConfig, number: &str) -> Result<()> {
    let launcher = build_launcher(config);
    let outcome = PhoneDispatcher::new(launcher.as_ref())
        .with_strategy(effective_strategy(config))
        .with_packages(config.dispatch.packages.clone())
        .dispatch(number);

    if !outcome.is_success() {
        bail!("{}", outcome.message());
    }
    println!("{}", outcome.message());
    Ok(())
}

fn list_history(config: &WhatsapperConfig, json: bool, limit: Option<usize>) -> Result<()> {
    let state = load_history(config)?;
    if !state.has_permission {
        // An empty JSON array would read as "no calls"
        if json {
            bail!("{}", NO_PERMISSION_MESSAGE);
        }
        println!("{}", NO_PERMISSION_MESSAGE);
        return Ok(());
    }

    let records: Vec<&CallRecord> = state.records.iter().take(limit.unwrap_or(usize::MAX)).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("{}", EMPTY_HISTORY_MESSAGE);
        return Ok(());
    }

    println!("Call History ({} entries)", state.records.len());
    for (i, record) in records.iter().enumerate() {
        let name = strip_ansi_codes(record.display_name());
        match &record.contact_name {
            Some(_) => println!("{:>4}. {}  {}", i + 1, name, strip_ansi_codes(&record.number)),
            None => println!("{:>4}. {}", i + 1, name),
        }
        println!(
            "      {} • {} • {}",
            record.call_type.label(),
            record.formatted_timestamp(),
            format_duration(record.duration_seconds)
        );
    }

    Ok(())
}

fn open_chat(config: &WhatsapperConfig, number: &str) -> Result<()> {
    dispatch_number(config, number)
}

fn pick_entry(config: &WhatsapperConfig, index: usize) -> Result<()> {
    let state = load_history(config)?;
    if !state.has_permission {
        bail!("{}", NO_PERMISSION_MESSAGE);
    }

    let record = index
        .checked_sub(1)
        .and_then(|i| state.records.get(i))
        .ok_or_else(|| anyhow!("No call at position {} ({} entries listed)", index, state.records.len()))?;

    println!("{} ({})", strip_ansi_codes(record.display_name()), strip_ansi_codes(&record.number));
    dispatch_number(config, &record.number)
}

fn check_number(number: &str) -> Result<()> {
    let normalized = normalize(number);
    let valid = is_valid(number);

    println!("Input:      {}", strip_ansi_codes(number));
    println!("Normalized: {}", normalized);
    println!("Valid:      {}", if valid { "yes" } else { "no" });
    if !valid {
        bail!("Invalid phone number");
    }
    println!("App link:   {}", native_link(&normalized));
    println!("Web link:   {}", web_link(&normalized));
    Ok(())
}

fn show_stats(config: &WhatsapperConfig) -> Result<()> {
    // Count every call, not just the latest one per number
    let mut all_calls = config.clone();
    all_calls.reader.deduplicate = false;
    let state = load_history(&all_calls)?;

    if !state.has_permission {
        println!("{}", NO_PERMISSION_MESSAGE);
        return Ok(());
    }

    let records = &state.records;
    let count = |call_type: CallType| records.iter().filter(|r| r.call_type == call_type).count();
    let unique_numbers: HashSet<&str> = records.iter().map(|r| r.number.as_str()).collect();
    let named = records.iter().filter(|r| r.contact_name.is_some()).count();
    let talk_time: u64 = records.iter().map(|r| r.duration_seconds).sum();

    println!("Call History Statistics");
    println!("=======================");
    println!("Total calls: {}", records.len());
    println!("  Incoming: {}", count(CallType::Incoming));
    println!("  Outgoing: {}", count(CallType::Outgoing));
    println!("  Missed: {}", count(CallType::Missed));
    println!("  Unknown: {}", count(CallType::Unknown));
    println!("Unique numbers: {}", unique_numbers.len());
    println!("Calls with a contact name: {}", named);
    println!("Total talk time: {}", format_duration(talk_time));

    // Source order is newest first
    if let Some(newest) = records.first() {
        println!("Newest call: {} ({})", newest.formatted_timestamp(), format_age(newest.timestamp));
    }
    if let Some(oldest) = records.last() {
        println!("Oldest call: {} ({})", oldest.formatted_timestamp(), format_age(oldest.timestamp));
    }
    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        println!("Config: {}", format_path_with_tilde(&path));
    }

    Ok(())
}

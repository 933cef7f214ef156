//! SubTrack CLI
//!
//! Command-line shell over the subscription store.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use subtrack::catalog::{PackageCatalog, CUSTOM_PACKAGE};
use subtrack::record::DATE_FORMAT;
use subtrack::{
    Config, RecordFilter, RecordForm, RecordId, Result, Status, Store, SubsError,
    SubscriptionRecord,
};
use tracing_subscriber::{fmt, EnvFilter};

/// SubTrack CLI
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(about = "Track customer subscriptions and flag the ones nearing expiry")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./subtrack_data")]
    data_dir: PathBuf,

    /// Journal entries to accumulate before writing a snapshot
    #[arg(long, default_value = "256")]
    checkpoint_after: usize,

    /// Notification threshold (days) when a record leaves it blank
    #[arg(long, default_value = "5")]
    default_notify_days: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a customer subscription
    Add(RecordArgs),

    /// Edit a subscription; omitted fields keep their current value
    Update {
        /// Record id
        id: u64,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Delete a subscription
    Delete {
        /// Record id
        id: u64,
    },

    /// Show one subscription in full
    Show {
        /// Record id
        id: u64,

        /// Classify as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List subscriptions by end date
    List {
        /// Only records with this status (active, warning, expired)
        #[arg(long)]
        status: Option<Status>,

        /// Only records whose name or phone contains this text
        #[arg(long)]
        search: Option<String>,

        /// Classify as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Find subscriptions by name or phone
    Search {
        /// Text to look for (case-insensitive)
        term: String,

        /// Classify as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Summarize expired and soon-to-expire subscriptions
    Due {
        /// Classify as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Max names shown per section
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List preset packages
    Packages,
}

/// Record fields as command-line flags
#[derive(ClapArgs, Debug)]
struct RecordArgs {
    /// Customer name
    #[arg(long)]
    name: Option<String>,

    /// Phone number
    #[arg(long)]
    phone: Option<String>,

    /// Package label (see `subtrack packages`); presets fill amount and end date
    #[arg(long)]
    package: Option<String>,

    /// Amount paid
    #[arg(long)]
    amount: Option<String>,

    /// Start date (YYYY-MM-DD), defaults to today on add
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,

    /// Days before the end date at which to warn
    #[arg(long)]
    notify_days: Option<String>,

    /// Free-text notes
    #[arg(long)]
    notes: Option<String>,
}

impl RecordArgs {
    /// Overlay the given flags on `base`, then fill blanks from the package preset
    fn apply_to(self, mut form: RecordForm, catalog: &PackageCatalog) -> RecordForm {
        let amount_given = self.amount.is_some();
        let end_given = self.end.is_some();
        let package_given = self.package.is_some();

        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.package {
            form.package = v;
        }
        if let Some(v) = self.amount {
            form.amount = v;
        }
        if let Some(v) = self.start {
            form.start_date = v;
        }
        if let Some(v) = self.end {
            form.end_date = v;
        }
        if let Some(v) = self.notify_days {
            form.notify_days = v;
        }
        if let Some(v) = self.notes {
            form.notes = v;
        }

        if package_given {
            catalog.prefill(&mut form, amount_given, end_given);
        }

        form
    }
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays clean for listings)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let catalog = PackageCatalog::default();

    if let Commands::Packages = args.command {
        print_packages(&catalog);
        return Ok(());
    }

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .checkpoint_after(args.checkpoint_after)
        .default_notify_days(args.default_notify_days)
        .build();
    let digest_limit = config.digest_limit;

    let mut store = Store::open(config)?;

    match args.command {
        Commands::Add(fields) => {
            let base = RecordForm {
                package: CUSTOM_PACKAGE.to_string(),
                start_date: today().format(DATE_FORMAT).to_string(),
                ..RecordForm::default()
            };
            let form = fields.apply_to(base, &catalog);
            let id = store.add(form)?;
            println!("Added {}", id);
        }
        Commands::Update { id, fields } => {
            let id = RecordId(id);
            let base = store
                .get(id)
                .ok_or(SubsError::RecordNotFound(id))?
                .to_form();
            let form = fields.apply_to(base, &catalog);
            store.update(id, form)?;
            println!("Updated {}", id);
        }
        Commands::Delete { id } => {
            let id = RecordId(id);
            store.delete(id)?;
            println!("Deleted {}", id);
        }
        Commands::Show { id, today: as_of } => {
            let id = RecordId(id);
            let record = store.get(id).ok_or(SubsError::RecordNotFound(id))?;
            print_record(record, as_of.unwrap_or_else(today));
        }
        Commands::List { status, search, today: as_of } => {
            let as_of = as_of.unwrap_or_else(today);
            let mut filter = RecordFilter::all();
            if let Some(term) = search {
                filter = filter.with_term(term);
            }
            if let Some(status) = status {
                filter = filter.with_status(status, as_of);
            }
            print_table(&store.list(Some(&filter)), as_of);
        }
        Commands::Search { term, today: as_of } => {
            print_table(&store.search(&term), as_of.unwrap_or_else(today));
        }
        Commands::Due { today: as_of, limit } => {
            let digest = store.digest(as_of.unwrap_or_else(today));
            if digest.is_empty() {
                println!("Nothing expired or expiring soon.");
            } else {
                print!("{}", digest.render(limit.unwrap_or(digest_limit)));
            }
        }
        // Printed before the store was opened
        Commands::Packages => {}
    }

    store.close()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Output
// =============================================================================

fn print_table(records: &[&SubscriptionRecord], today: NaiveDate) {
    if records.is_empty() {
        println!("No subscriptions.");
        return;
    }

    println!(
        "{:>5}  {:<20}  {:<14}  {:<16}  {:>10}  {:<10}  {}",
        "ID", "NAME", "PHONE", "PACKAGE", "AMOUNT", "ENDS", "STATUS"
    );
    for record in records {
        println!(
            "{:>5}  {:<20}  {:<14}  {:<16}  {:>10}  {:<10}  {}",
            record.id.get(),
            record.name,
            record.phone.as_deref().unwrap_or("-"),
            record.package,
            record.amount,
            record.end_date.format(DATE_FORMAT),
            record.classify(today)
        );
    }
}

fn print_record(record: &SubscriptionRecord, today: NaiveDate) {
    println!("{}  {}", record.id, record.name);
    println!("  phone:       {}", record.phone.as_deref().unwrap_or("-"));
    println!("  package:     {}", record.package);
    println!("  amount:      {}", record.amount);
    println!("  start:       {}", record.start_date.format(DATE_FORMAT));
    println!("  end:         {}", record.end_date.format(DATE_FORMAT));
    println!("  notify days: {}", record.notify_days);
    println!("  status:      {}", record.classify(today));
    println!("  notes:       {}", record.notes.as_deref().unwrap_or("-"));
    println!("  created:     {}", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

fn print_packages(catalog: &PackageCatalog) {
    println!("{:<16}  {:>8}  {}", "PACKAGE", "PRICE", "DURATION");
    for package in catalog.iter() {
        let duration = match package.months {
            0 => "custom".to_string(),
            1 => "1 month".to_string(),
            n => format!("{} months", n),
        };
        println!("{:<16}  {:>8}  {}", package.label, package.price, duration);
    }
}

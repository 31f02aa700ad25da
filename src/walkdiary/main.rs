use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use walkdiary::api::{NoteDraft, PrefsAction};
use walkdiary::config::DiaryConfig;
use walkdiary::error::{DiaryError, Result};
use walkdiary::geo::gpsd::GpsdSource;
use walkdiary::geo::sampler::FixedSource;
use walkdiary::geo::{GeoSampler, PositionSource};
use walkdiary::init::{data_dir, initialize, DiaryContext};
use walkdiary::recorder::TrailRecorder;

mod args;
mod print;
use args::{Cli, Commands, LocationArgs};
use print::{
    print_data_dir, print_entries, print_messages, print_prefs, print_progress, print_trails,
    TerminalNotifier,
};

const LOG_ENV: &str = "WALKDIARY_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("walkdiary=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut ctx = initialize(&data_dir()?);

    match cli.command {
        Some(Commands::Note {
            text,
            photo,
            no_location,
            location,
        }) => {
            let draft = NoteDraft {
                text: text.join(" "),
                photo,
                without_location: no_location,
            };
            handle_note(ctx, draft, location).await
        }
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Trails) => handle_trails(&ctx),
        Some(Commands::Record { location, every }) => {
            handle_record(ctx, location, Duration::from_secs(every)).await
        }
        Some(Commands::Export { dir }) => handle_export(&ctx, dir),
        Some(Commands::Import { path }) => handle_import(&mut ctx, path).await,
        Some(Commands::Prefs { key, value }) => handle_prefs(&mut ctx, key, value).await,
        Some(Commands::Nudge) => handle_nudge(&ctx),
        Some(Commands::Reset { yes }) => handle_reset(&mut ctx, yes).await,
    }
}

fn sampler_for(config: &DiaryConfig, location: LocationArgs) -> GeoSampler {
    let source: Arc<dyn PositionSource> = match (location.at, location.gpsd) {
        (Some(position), _) => Arc::new(FixedSource(position)),
        (None, Some(gpsd)) => Arc::new(gpsd),
        (None, None) => Arc::new(GpsdSource::new(
            config.gpsd_host.clone(),
            config.gpsd_port,
        )),
    };
    GeoSampler::new(source, Arc::new(TerminalNotifier))
}

async fn handle_note(ctx: DiaryContext, draft: NoteDraft, location: LocationArgs) -> Result<()> {
    let sampler = sampler_for(&ctx.config, location);
    let mut api = ctx.api.with_sampler(sampler);
    let result = api.add_entry(draft).await;
    if !result.affected_entries.is_empty() {
        print_entries(&result.affected_entries);
    }
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(DiaryError::Api("the note was not saved".into()));
    }
    Ok(())
}

fn handle_list(ctx: &DiaryContext) -> Result<()> {
    let result = ctx.api.list_entries();
    print_entries(&result.listed_entries);
    print_messages(&result.messages);
    Ok(())
}

fn handle_trails(ctx: &DiaryContext) -> Result<()> {
    let result = ctx.api.list_trails();
    print_trails(&result.listed_trails, ctx.api.state().prefs.unit);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_record(ctx: DiaryContext, location: LocationArgs, every: Duration) -> Result<()> {
    let sampler = sampler_for(&ctx.config, location);
    let mut api = ctx
        .api
        .with_sampler(sampler)
        .with_recorder(TrailRecorder::with_period(every));
    let unit = api.state().prefs.unit;

    let result = api.start_trail().await?;
    print_messages(&result.messages);
    println!("Press Ctrl-C to stop.");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            sample = api.next_sample() => match sample {
                Some(sample) => {
                    if api.apply_sample(sample) {
                        if let Some(trail) = api.active_trail() {
                            print_progress(trail, unit);
                        }
                    }
                }
                None => break,
            },
            signal = &mut ctrl_c => {
                signal.map_err(DiaryError::Io)?;
                break;
            }
        }
    }
    println!();

    let result = api.stop_trail().await?;
    print_trails(&result.listed_trails, unit);
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &DiaryContext, dir: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let dir = dir.unwrap_or_else(|| ctx.config.export_dir_or(&cwd));
    let result = ctx.api.export(&dir)?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_import(ctx: &mut DiaryContext, path: PathBuf) -> Result<()> {
    let result = ctx.api.import_file(&path).await;
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(DiaryError::Api("nothing was imported".into()));
    }
    Ok(())
}

async fn handle_prefs(
    ctx: &mut DiaryContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => PrefsAction::ShowAll,
        (Some(key), None) => PrefsAction::ShowKey(key),
        (Some(key), Some(value)) => PrefsAction::Set(key, value),
    };
    let show_all = matches!(action, PrefsAction::ShowAll);

    let result = ctx.api.prefs(action).await;
    if let (Some(prefs), true) = (&result.prefs, result.messages.is_empty()) {
        print_prefs(prefs);
        if show_all {
            print_data_dir(&ctx.data_dir);
        }
    }
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(DiaryError::Api("preferences unchanged".into()));
    }
    Ok(())
}

fn handle_nudge(ctx: &DiaryContext) -> Result<()> {
    let result = ctx.api.nudge();
    print_messages(&result.messages);
    Ok(())
}

async fn handle_reset(ctx: &mut DiaryContext, yes: bool) -> Result<()> {
    if !yes {
        return Err(DiaryError::Api(
            "this deletes every note and trail; run again with --yes to confirm".into(),
        ));
    }
    let result = ctx.api.reset().await?;
    print_messages(&result.messages);
    Ok(())
}

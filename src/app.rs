use clap::Parser;
use colored::Colorize;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressDrawTarget};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use crate::browser::{self, LoadOutcome, RecipeBrowser};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::page::{ClickTarget, Page};

fn print_banner() {
    const BANNER: &str = r#"
                          __                      __
   ____ ___  ___  ____ _/ /_____________  __  __/ /_
  / __ `__ \/ _ \/ __ `/ / ___/ ___/ __ \/ / / / __/
 / / / / / /  __/ /_/ / (__  ) /__/ /_/ / /_/ / /_
/_/ /_/ /_/\___/\__,_/_/____/\___/\____/\__,_/\__/
       v0.1.0 - terminal recipe browser
    "#;
    print!("{}", BANNER);
    println!();
}

const SESSION_HELP: &str = "commands:
  areas            list cuisines
  select <value>   choose a cuisine ('random' for a random meal, empty for none)
  random           same as 'select random'
  clear            same as an empty selection
  open <n>         open recipe card n
  esc              press Escape
  backdrop         click outside the recipe
  inside           click inside the recipe
  show             redraw the page
  save <file>      write a snapshot (format from extension)
  help             this text
  quit             leave
";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Action {
    Interactive,
    Area(String),
    Random,
    Meal(String),
}

#[derive(Clone, Debug)]
struct RunConfig {
    options: browser::Options,
    action: Action,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let defaults = browser::Options::default();
    let api_base = args.api_base.or(cfg.api_base).unwrap_or(defaults.api_base);
    crate::api::normalize_api_base(&api_base).map_err(|e| e.to_string())?;
    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(defaults.timeout_seconds);
    validation::validate_timeout(timeout_seconds)?;
    let proxy = args
        .proxy
        .or(cfg.proxy)
        .filter(|p| !p.trim().is_empty());
    let user_agent = args
        .user_agent
        .or(cfg.user_agent)
        .unwrap_or(defaults.user_agent);

    let action = if let Some(area) = args.area {
        Action::Area(area.trim().to_string())
    } else if args.random {
        Action::Random
    } else if let Some(meal) = args.meal {
        Action::Meal(meal.trim().to_string())
    } else {
        Action::Interactive
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output format '{raw}'"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        options: browser::Options {
            api_base,
            timeout_seconds,
            proxy,
            user_agent,
        },
        action,
        output,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

fn init_logging(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .try_init();
}

fn resolve_format(path: &str, explicit: Option<OutputFormat>) -> OutputFormat {
    explicit
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text)
}

async fn write_snapshot(page: &Page, path: &str, format: OutputFormat) -> Result<(), String> {
    let rendered = output::render(page, format);
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    // tokio buffers file writes; errors only surface on flush
    outfile
        .flush()
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    Ok(())
}

fn print_page(pb: &ProgressBar, page: &Page) {
    let rendered = String::from_utf8_lossy(&output::render_text(page)).to_string();
    pb.suspend(|| {
        println!();
        print!("{rendered}");
    });
}

fn print_areas(pb: &ProgressBar, page: &Page) {
    pb.suspend(|| {
        for opt in page.area_options.iter() {
            println!(":: {}", opt.label.bold().white());
        }
    });
}

fn describe(outcome: LoadOutcome) -> Option<&'static str> {
    match outcome {
        LoadOutcome::Stale => Some("superseded by a newer selection"),
        LoadOutcome::Failed => Some("request failed"),
        LoadOutcome::Rendered | LoadOutcome::Empty => None,
    }
}

async fn run_once(
    run: &RunConfig,
    browser: &RecipeBrowser,
    pb: &ProgressBar,
) -> Result<(), String> {
    browser.load_areas().await;
    let outcome = match &run.action {
        Action::Area(area) => browser.on_selection_change(area).await,
        Action::Random => browser.on_selection_change(crate::model::RANDOM_SENTINEL).await,
        Action::Meal(id) => browser.show_recipe_detail(id).await,
        Action::Interactive => return Ok(()),
    };
    let page = browser.snapshot().await;
    print_page(pb, &page);

    if let Some(path) = run.output.as_deref() {
        write_snapshot(&page, path, resolve_format(path, run.output_format)).await?;
        println!();
        println!(":: Snapshot saved to {} ::", path.bold().cyan());
    }

    match outcome {
        LoadOutcome::Failed => Err("the recipe service request failed".to_string()),
        _ => Ok(()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

type PendingLoads = FuturesUnordered<JoinHandle<LoadOutcome>>;

// a failing command only reports its error; the session keeps going
async fn handle_command(
    line: &str,
    browser: &RecipeBrowser,
    pb: &ProgressBar,
    pending: &mut PendingLoads,
) -> Flow {
    let line = line.trim();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };
    match cmd {
        "" => {}
        "quit" | "exit" | "q" => return Flow::Quit,
        "help" | "?" => print!("{SESSION_HELP}"),
        "areas" => print_areas(pb, &browser.snapshot().await),
        "show" => print_page(pb, &browser.snapshot().await),
        "select" | "random" | "clear" => {
            let value = match cmd {
                "random" => crate::model::RANDOM_SENTINEL.to_string(),
                "clear" => String::new(),
                _ => arg.to_string(),
            };
            let b = browser.clone();
            pending.push(tokio::spawn(async move {
                b.on_selection_change(&value).await
            }));
        }
        "open" => {
            let page = browser.snapshot().await;
            let card = arg
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| page.card(i).cloned());
            match card {
                Some(card) => {
                    let b = browser.clone();
                    pending.push(tokio::spawn(async move {
                        b.show_recipe_detail(&card.id).await
                    }));
                }
                None => println!(":: no card '{arg}' ({} shown)", page.cards.len()),
            }
        }
        "esc" | "escape" => {
            if browser.key_down("Escape").await {
                print_page(pb, &browser.snapshot().await);
            }
        }
        "backdrop" | "inside" => {
            let target = if cmd == "backdrop" {
                ClickTarget::Backdrop
            } else {
                ClickTarget::Content
            };
            if browser.click_modal(target).await {
                print_page(pb, &browser.snapshot().await);
            }
        }
        "save" => {
            if arg.is_empty() {
                println!(":: usage: save <file>");
            } else {
                let path = config::expand_tilde_string(arg);
                let format = resolve_format(&path, None);
                match write_snapshot(&browser.snapshot().await, &path, format).await {
                    Ok(()) => println!(":: Snapshot saved to {} ::", path.bold().cyan()),
                    Err(e) => pb.println(format!(":: {}", e.red())),
                }
            }
        }
        other => println!(":: unknown command '{other}', try 'help'"),
    }
    Flow::Continue
}

async fn run_session(browser: &RecipeBrowser, pb: &ProgressBar) -> Result<(), String> {
    browser.load_areas().await;
    print_areas(pb, &browser.snapshot().await);
    print_page(pb, &browser.snapshot().await);
    println!();
    print!("{SESSION_HELP}");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut pending = PendingLoads::new();
    let mut result = Ok(());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if handle_command(&line, browser, pb, &mut pending).await == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        result = Err(format!("failed to read input: {e}"));
                        break;
                    }
                }
            }
            Some(done) = pending.next(), if !pending.is_empty() => {
                match done {
                    Ok(LoadOutcome::Stale) => {}
                    Ok(outcome) => {
                        if let Some(msg) = describe(outcome) {
                            pb.println(format!(":: {}", msg.yellow()));
                        }
                        print_page(pb, &browser.snapshot().await);
                    }
                    Err(e) => tracing::error!(error = %e, "load task failed"),
                }
            }
        }
    }

    // let in-flight loads settle before the runtime goes away
    while let Some(done) = pending.next().await {
        if let Err(e) = done {
            tracing::error!(error = %e, "load task failed");
        }
    }
    result
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    let browser = RecipeBrowser::new(&run.options)
        .map_err(|e| e.to_string())?
        .with_spinner(pb.clone());

    match run.action {
        Action::Interactive => run_session(&browser, &pb).await,
        _ => run_once(&run, &browser, &pb).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::try_parse().map_err(|e| match e.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
            e.exit()
        }
        _ => e.to_string(),
    })?;

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "could not determine home directory".to_string())?,
        };
        if config::ensure_default_config_file(&path)? {
            println!(":: Config written to {}", path.display());
        } else {
            println!(":: Config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

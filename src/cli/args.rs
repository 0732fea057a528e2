use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mealscout",
    version,
    about = "terminal recipe browser",
    long_about = "Mealscout browses TheMealDB recipes by cuisine, shows full recipes and picks random meals.\n\nExamples:\n  mealscout\n  mealscout -a Italian -o italian.html\n  mealscout --random --output-format json -o meal.json\n  mealscout -m 52772\n\nWithout --area, --random or --meal an interactive session starts."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write a page snapshot to FILE after a one-shot action."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Snapshot format: text, json or html (inferred from FILE when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'a',
        long = "ar",
        visible_alias = "area",
        value_name = "CUISINE",
        help_heading = "Browse",
        help = "List recipes for a cuisine and exit."
    )]
    pub area: Option<String>,

    #[arg(
        short = 'R',
        long = "rnd",
        visible_alias = "random",
        help_heading = "Browse",
        help = "Show a random recipe and exit."
    )]
    pub random: bool,

    #[arg(
        short = 'm',
        long = "ml",
        visible_alias = "meal",
        value_name = "ID",
        help_heading = "Browse",
        help = "Show the recipe with this id and exit."
    )]
    pub meal: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.mealscout/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write the default config file if it does not exist, then exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "api",
        visible_alias = "api-base",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Base URL of the recipe service."
    )]
    pub api_base: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECS",
        help_heading = "HTTP",
        help = "Request timeout in seconds (0 disables it)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy for all requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "ua",
        visible_alias = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "User-Agent header sent with every request."
    )]
    pub user_agent: Option<String>,
}

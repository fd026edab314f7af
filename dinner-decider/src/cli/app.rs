use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dinner-decider",
    version,
    about = "Dinner Decider - Let a local language model pick tonight's dinner",
    long_about = "Dinner Decider turns loose dinner preferences into one detailed meal suggestion by asking a local language model to analyze the preferences, brainstorm ideas, and write up the best one. Recently suggested meals are remembered so they are not repeated."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest a dinner
    #[command(about = "Suggest a dinner from your preferences")]
    Suggest(SuggestArgs),

    /// Show or clear recently suggested meals
    #[command(about = "Show or clear the recently suggested meals")]
    History(HistoryArgs),

    /// Check that the model endpoint is reachable
    #[command(about = "Check that the configured model endpoint is reachable")]
    Check,

    /// Write the default configuration file
    #[command(about = "Write the default configuration file")]
    Init(InitArgs),
}

#[derive(Parser, Debug, Default)]
pub struct SuggestArgs {
    /// Dietary preference (e.g., Vegetarian, Vegan, Gluten-Free, None)
    #[arg(long, help = "Dietary preference, e.g. Vegetarian, Vegan, Gluten-Free")]
    pub dietary: Option<String>,

    /// Cuisine preference (e.g., Italian, Mexican, Asian, Indian, None)
    #[arg(long, help = "Cuisine preference, e.g. Italian, Mexican, Indian")]
    pub cuisine: Option<String>,

    /// Desired cooking time (e.g., <30min, 30-60min, >60min)
    #[arg(long, help = "Desired cooking time, e.g. <30min, 30-60min, >60min")]
    pub time: Option<String>,

    /// Ingredients to use, comma-separated
    #[arg(long = "use", value_name = "LIST", help = "Ingredients to use, comma-separated")]
    pub ingredients_to_use: Option<String>,

    /// Ingredients to avoid, comma-separated
    #[arg(long = "avoid", value_name = "LIST", help = "Ingredients to avoid, comma-separated")]
    pub ingredients_to_avoid: Option<String>,

    /// Ask for each preference interactively
    #[arg(short, long, help = "Ask for each preference interactively")]
    pub interactive: bool,

    /// Print the run as JSON
    #[arg(long, help = "Print the full run as JSON")]
    pub json: bool,
}

impl SuggestArgs {
    /// True when at least one preference was given on the command line
    pub fn has_preferences(&self) -> bool {
        self.dietary.is_some()
            || self.cuisine.is_some()
            || self.time.is_some()
            || self.ingredients_to_use.is_some()
            || self.ingredients_to_avoid.is_some()
    }
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Forget all remembered meals
    #[arg(long, help = "Forget all remembered meals")]
    pub clear: bool,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, help = "Overwrite an existing configuration file")]
    pub force: bool,
}

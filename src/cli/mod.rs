//! Command-line interface for custom-trends.
//!
//! Provides commands for fetching trends once, previewing the rendered
//! post-creation prompt, and inspecting configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, EnvSettings, BACKEND_API_URL};
use crate::providers::{compose_state, Provider, TrendsProvider};
use crate::template::{PostTemplate, TemplateVars, POST_CREATION_TEMPLATE};

/// custom-trends - Trends provider for agent post generation
#[derive(Parser, Debug)]
#[command(name = "custom-trends")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch trends once and print the provider state as JSON
    Fetch {
        /// Backend base URL (overrides config file and environment)
        #[arg(long)]
        base_url: Option<String>,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Render the post-creation prompt with live trends
    Render {
        /// Backend base URL (overrides config file and environment)
        #[arg(long)]
        base_url: Option<String>,

        /// Agent display name
        #[arg(long)]
        agent_name: Option<String>,

        /// Agent's Twitter handle (without @)
        #[arg(long)]
        user_name: Option<String>,

        /// Tone of the post
        #[arg(long)]
        adjective: Option<String>,

        /// Topic of the post
        #[arg(long)]
        topic: Option<String>,
    },

    /// Print the raw post-creation template
    Template,

    /// Show resolved configuration (debug)
    Config {
        /// Backend base URL override to take into account
        #[arg(long)]
        base_url: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Fetch { base_url, compact } => fetch(base_url, compact).await,
            Commands::Render {
                base_url,
                agent_name,
                user_name,
                adjective,
                topic,
            } => {
                let overrides = VarOverrides {
                    agent_name,
                    user_name,
                    adjective,
                    topic,
                };
                render(base_url, overrides).await
            }
            Commands::Template => {
                println!("{}", POST_CREATION_TEMPLATE);
                Ok(())
            }
            Commands::Config { base_url } => show_config(base_url),
        }
    }
}

/// Template variables given on the command line
struct VarOverrides {
    agent_name: Option<String>,
    user_name: Option<String>,
    adjective: Option<String>,
    topic: Option<String>,
}

impl VarOverrides {
    fn apply(self, mut vars: TemplateVars) -> TemplateVars {
        if let Some(v) = self.agent_name {
            vars.agent_name = v;
        }
        if let Some(v) = self.user_name {
            vars.twitter_user_name = v;
        }
        if let Some(v) = self.adjective {
            vars.adjective = v;
        }
        if let Some(v) = self.topic {
            vars.topic = v;
        }
        vars
    }
}

/// Run the trends provider once
async fn fetch(base_url: Option<String>, compact: bool) -> Result<()> {
    let config = config::config()?;
    let runtime = config.runtime_settings(base_url);

    let provider = TrendsProvider::with_fallback(EnvSettings);
    let result = provider.get(&runtime).await;

    let output = if compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .context("Failed to serialize trends")?;

    println!("{}", output);
    eprintln!("[{} trend(s)]", result.len());
    Ok(())
}

/// Compose provider state and render the post prompt
async fn render(base_url: Option<String>, overrides: VarOverrides) -> Result<()> {
    let config = config::config()?;
    let runtime = config.runtime_settings(base_url);

    let providers: Vec<Box<dyn Provider>> =
        vec![Box::new(TrendsProvider::with_fallback(EnvSettings))];
    let state = compose_state(&providers, &runtime).await;

    let vars = overrides.apply(TemplateVars::from(&config.agent));
    let template = PostTemplate::new().context("Failed to load post template")?;
    let prompt = template
        .render(&vars, &state)
        .context("Failed to render post template")?;

    println!("{}", prompt);
    Ok(())
}

/// Show resolved configuration
fn show_config(base_url: Option<String>) -> Result<()> {
    let config = config::config()?;

    println!("custom-trends configuration");
    println!("===========================");
    println!();

    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using environment)"),
    }

    let settings = config.effective_settings(base_url);
    match settings.resolve(BACKEND_API_URL) {
        Some((source, value)) => println!("{}: {} (from {})", BACKEND_API_URL, value, source),
        None => println!("{}: (not set, trends will be empty)", BACKEND_API_URL),
    }

    let agent = &config.agent;
    println!();
    println!("Agent:");
    println!("  name:              {}", agent.name.as_deref().unwrap_or("-"));
    println!(
        "  twitter_user_name: {}",
        agent.twitter_user_name.as_deref().unwrap_or("-")
    );
    println!("  adjective:         {}", agent.adjective.as_deref().unwrap_or("-"));
    println!("  topic:             {}", agent.topic.as_deref().unwrap_or("-"));

    Ok(())
}

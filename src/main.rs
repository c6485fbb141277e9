use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use devbattle::analysis::AnalyzedProfile;
use devbattle::models::{BattleResult, BattleStats, DevProfile};
use devbattle::{
    BattleArena, Config, FetcherConfig, GeminiProvider, GitHubClient, GitHubProfileFetcher,
    ProfileAnalyzer, Storage,
};
use devbattle::storage::read_last_battle;

#[derive(Parser, Debug)]
#[command(name = "devbattle")]
#[command(version = "0.1.0")]
#[command(about = "Pit two GitHub profiles against each other and see who comes out on top")]
struct Args {
    /// Session cache database (defaults to SESSION_DB_PATH or devbattle-session.db)
    #[arg(long, global = true)]
    session_db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Battle two GitHub users head-to-head
    Battle {
        username1: String,
        username2: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Don't store the result in the session cache
        #[arg(long)]
        no_cache: bool,
    },
    /// AI career analysis of a single GitHub user
    Analyze {
        username: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the last battle of this session
    Last {
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
    /// End the session by clearing the cached battle result
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("devbattle=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let session_db = args
        .session_db
        .clone()
        .unwrap_or_else(|| config.session_db_path.clone());

    match args.command {
        Command::Battle {
            username1,
            username2,
            format,
            output,
            no_cache,
        } => {
            let mut arena = BattleArena::new(fetcher(&config)?, llm(&config)?);
            if !no_cache {
                match Storage::new(&session_db) {
                    Ok(storage) => arena = arena.with_session(storage),
                    Err(e) => tracing::warn!("Session cache unavailable ({}): {}", session_db, e),
                }
            }

            let spinner = spinner(format!("{} vs {}...", username1.trim(), username2.trim()));
            let result = arena.run_battle(&username1, &username2).await;
            spinner.finish_and_clear();

            let result = result?;
            write_output(&render_battle(&result, format)?, output.as_deref())?;
        }
        Command::Analyze {
            username,
            format,
            output,
        } => {
            let analyzer = ProfileAnalyzer::new(fetcher(&config)?, llm(&config)?);

            let spinner = spinner(format!("Analyzing {}...", username.trim()));
            let analyzed = analyzer.analyze_user(&username).await;
            spinner.finish_and_clear();

            let analyzed = analyzed?;
            write_output(&render_analysis(&analyzed, format)?, output.as_deref())?;
        }
        Command::Last { format } => match read_last_battle(&session_db) {
            Some(result) => write_output(&render_battle(&result, format)?, None)?,
            None => println!("No battle in this session yet."),
        },
        Command::Clear => match Storage::new(&session_db).and_then(|s| s.clear_battle_result()) {
            Ok(true) => println!("Session cleared."),
            Ok(false) => println!("Nothing to clear."),
            Err(e) => {
                tracing::warn!("Session cache {} unavailable: {}", session_db, e);
                println!("Nothing to clear.");
            }
        },
    }

    Ok(())
}

fn fetcher(config: &Config) -> anyhow::Result<GitHubProfileFetcher> {
    let github = GitHubClient::new(config.github_token.as_deref())?;
    Ok(GitHubProfileFetcher::new(github, FetcherConfig::from(config)))
}

fn llm(config: &Config) -> anyhow::Result<GeminiProvider> {
    Ok(GeminiProvider::new(
        config.gemini_api_key.clone(),
        Some(config.gemini_model.clone()),
    )?)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn write_output(output: &str, path: Option<&str>) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn render_battle(result: &BattleResult, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(result)?,
        Format::Markdown => battle_markdown(result),
        Format::Text => battle_text(result),
    })
}

fn render_analysis(analyzed: &AnalyzedProfile, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&analyzed_json(analyzed))?,
        Format::Markdown => analysis_markdown(analyzed),
        Format::Text => analysis_text(analyzed),
    })
}

fn analyzed_json(analyzed: &AnalyzedProfile) -> serde_json::Value {
    serde_json::json!({
        "profile": analyzed.profile,
        "analysis": analyzed.analysis,
    })
}

const STAT_ROWS: [(&str, f64); 6] = [
    ("Repositories", 20.0),
    ("Followers", 15.0),
    ("Activity", 20.0),
    ("Languages", 15.0),
    ("Contribution", 15.0),
    ("Organizations", 15.0),
];

fn stat_values(stats: &BattleStats) -> [f64; 6] {
    [
        stats.repo_score,
        stats.followers_score,
        stats.activity_score,
        stats.language_score,
        stats.contribution_score,
        stats.organization_score,
    ]
}

fn battle_text(result: &BattleResult) -> String {
    let mut output = String::new();
    let winner = &result.winner;
    let loser = &result.loser;

    output.push_str(&format!(
        "\n=== {} vs {} ===\n\n",
        winner.username, loser.username
    ));
    output.push_str(&format!(
        "Winner: {} ({:.1})\n  {}\n",
        winner.username,
        result.winner_stats().total_score,
        result.humorous_comments.winner
    ));
    output.push_str(&format!(
        "Loser:  {} ({:.1})\n  {}\n\n",
        loser.username,
        result.loser_stats().total_score,
        result.humorous_comments.loser
    ));

    output.push_str(&format!(
        "{:<16}{:>14}{:>14}\n",
        "", winner.username, loser.username
    ));
    let winner_values = stat_values(result.winner_stats());
    let loser_values = stat_values(result.loser_stats());
    for (i, (label, max)) in STAT_ROWS.iter().enumerate() {
        output.push_str(&format!(
            "{:<16}{:>14}{:>14}\n",
            label,
            format!("{:.1}/{}", winner_values[i], max),
            format!("{:.1}/{}", loser_values[i], max),
        ));
    }

    output.push('\n');
    output.push_str(&profile_text(winner));
    output.push_str(&profile_text(loser));

    if let Some(ref insights) = result.insights {
        output.push_str(&format!("\nWhy {} won:\n", winner.username));
        for factor in &insights.winning_factors {
            output.push_str(&format!("  + {}\n", factor));
        }
        output.push_str(&format!("\nHow {} can level up:\n", loser.username));
        for area in &insights.improvement_areas {
            output.push_str(&format!("  - {}\n", area));
        }
    }

    if let Some(ref error) = result.error {
        output.push_str(&format!("\n(!) {}\n", error.message));
    }

    output
}

fn profile_text(profile: &DevProfile) -> String {
    let mut output = format!("{}:\n", profile.username);
    output.push_str(&format!(
        "  Repos: {}  Followers: {}  Orgs: {}\n",
        profile.repositories,
        profile.followers,
        profile.organizations.len()
    ));
    if !profile.top_languages.is_empty() {
        output.push_str(&format!(
            "  Languages: {}\n",
            profile.top_languages.join(", ")
        ));
    }
    if let Some(ref last) = profile.last_commit_date {
        output.push_str(&format!("  Last active: {}\n", last.format("%Y-%m-%d")));
    }
    output
}

fn battle_markdown(result: &BattleResult) -> String {
    let mut output = String::new();
    let winner = &result.winner;
    let loser = &result.loser;

    output.push_str(&format!(
        "# {} vs {}\n\n",
        winner.username, loser.username
    ));
    output.push_str(&format!(
        "**Winner:** {} ({:.1}). {}\n\n",
        winner.username,
        result.winner_stats().total_score,
        result.humorous_comments.winner
    ));
    output.push_str(&format!(
        "**Loser:** {} ({:.1}). {}\n\n",
        loser.username,
        result.loser_stats().total_score,
        result.humorous_comments.loser
    ));

    output.push_str(&format!(
        "| Score | {} | {} |\n|-------|------|------|\n",
        winner.username, loser.username
    ));
    let winner_values = stat_values(result.winner_stats());
    let loser_values = stat_values(result.loser_stats());
    for (i, (label, max)) in STAT_ROWS.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {:.1}/{} | {:.1}/{} |\n",
            label, winner_values[i], max, loser_values[i], max
        ));
    }
    output.push_str(&format!(
        "| **Total** | **{:.1}** | **{:.1}** |\n",
        result.winner_stats().total_score,
        result.loser_stats().total_score
    ));

    if let Some(ref insights) = result.insights {
        output.push_str("\n## Winning Factors\n\n");
        for factor in &insights.winning_factors {
            output.push_str(&format!("- {}\n", factor));
        }
        output.push_str("\n## Improvement Areas\n\n");
        for area in &insights.improvement_areas {
            output.push_str(&format!("- {}\n", area));
        }
    }

    if let Some(ref error) = result.error {
        output.push_str(&format!("\n> {}\n", error.message));
    }

    output
}

fn analysis_text(analyzed: &AnalyzedProfile) -> String {
    let mut output = format!("\n=== Career Analysis: {} ===\n", analyzed.profile.username);
    for (name, items) in analyzed.analysis.sections() {
        output.push_str(&format!("\n{}:\n", section_title(name)));
        for item in items {
            output.push_str(&format!("  - {}\n", item));
        }
    }
    let salary = analyzed.analysis.salary_range;
    output.push_str(&format!(
        "\nSalary range: ${:.0} - ${:.0}\n",
        salary.min, salary.max
    ));
    output
}

fn analysis_markdown(analyzed: &AnalyzedProfile) -> String {
    let mut output = format!("# Career Analysis: {}\n", analyzed.profile.username);
    for (name, items) in analyzed.analysis.sections() {
        output.push_str(&format!("\n## {}\n\n", section_title(name)));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
    }
    let salary = analyzed.analysis.salary_range;
    output.push_str(&format!(
        "\n**Salary range:** ${:.0} - ${:.0}\n",
        salary.min, salary.max
    ));
    output
}

fn section_title(name: &str) -> &str {
    match name {
        "strengths" => "Strengths",
        "weaknesses" => "Weaknesses",
        "skillGaps" => "Skill Gaps",
        "recommendations" => "Recommendations",
        other => other,
    }
}

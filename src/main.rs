mod app;
mod config;
mod input;
mod logging;
mod lyrics;
mod player;
mod tui;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "cmus-lyrics", version, about = "Lyrics for the song playing in cmus")]
struct Cli {
    /// Do a one-off query for lyrics and print to stdout.
    /// For best results, query "<artist> <track>".
    #[arg(short, long, value_name = "TEXT")]
    query: Option<String>,

    /// Show keybinding help text in the footer.
    #[arg(long)]
    show_help_footer: bool,

    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match one_off_query(cli.query.as_deref())? {
        Some(query) => {
            logging::init_stderr();
            let cfg = config::load(cli.config.as_deref()).context("load config")?;
            let lyrics = query_once(&cfg, query).await?;
            println!("{lyrics}");
        }
        None => {
            let _log_guard = logging::init_file(&config::log_dir()).context("init logging")?;
            let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
            cfg.ui.show_help_footer |= cli.show_help_footer;

            let mut app = app::App::new(cfg)?;
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
    }

    Ok(())
}

/// `--query` with only whitespace is a usage error, not a request for the UI.
fn one_off_query(query: Option<&str>) -> anyhow::Result<Option<&str>> {
    match query {
        Some(q) if q.trim().is_empty() => anyhow::bail!("--query needs non-empty search text"),
        other => Ok(other),
    }
}

async fn query_once(cfg: &config::Config, query: &str) -> anyhow::Result<String> {
    let genius = lyrics::GeniusClient::new(&cfg.genius)?;
    let lyrics = genius
        .fetch_lyrics(query, &CancellationToken::new())
        .await
        .with_context(|| format!("fetch lyrics for {query:?}"))?;
    Ok(lyrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_is_rejected() {
        assert!(one_off_query(Some("   ")).is_err());
        assert!(one_off_query(Some("")).is_err());
        assert_eq!(one_off_query(None).unwrap(), None);
        assert_eq!(one_off_query(Some(" abba waterloo")).unwrap(), Some(" abba waterloo"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["cmus-lyrics", "-q", "abba waterloo", "--show-help-footer"])
            .unwrap();
        assert_eq!(cli.query.as_deref(), Some("abba waterloo"));
        assert!(cli.show_help_footer);
        assert!(cli.config.is_none());
    }
}

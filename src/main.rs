use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use lyricscli::{
    cli::{self, ClientOptions},
    config, error, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Base URL of the lyrics finder backend [env: LYRICS_BACKEND_URL]
    #[clap(long, global = true)]
    backend_url: Option<String>,

    /// Request timeout in seconds [env: LYRICS_REQUEST_TIMEOUT_SECS]
    #[clap(long, global = true)]
    timeout: Option<u64>,

    /// Ignore responses to searches that were superseded by a newer one
    #[clap(long, global = true)]
    latest_request_wins: bool,

    /// Show the underlying cause of network errors
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find songs by a fragment of their lyrics
    Search(SearchOptions),

    /// Show the details of a song by its Spotify track id
    Song(SongOptions),

    /// Search and browse songs from a prompt
    Interactive,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// The lyric phrase; quoting is optional
    #[clap(required = true, num_args = 1..)]
    pub phrase: Vec<String>,

    /// Show the details of match number N (as printed, starting at 1)
    #[clap(long, value_name = "N")]
    pub select: Option<usize>,

    /// Open the selected song in Spotify
    #[clap(long, requires = "select")]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SongOptions {
    /// Spotify track id, as returned with a match
    pub id: String,

    /// Open the song in Spotify
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let client = ClientOptions::resolve(
        cli.backend_url,
        cli.timeout,
        cli.latest_request_wins,
        cli.verbose,
    );

    match cli.command {
        Command::Search(opt) => cli::search(&client, opt.phrase, opt.select, opt.open).await,
        Command::Song(opt) => cli::song(&client, opt.id, opt.open).await,
        Command::Interactive => {
            if let Err(e) = cli::interactive(&client).await {
                error!("Prompt failed. Err: {}", e);
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

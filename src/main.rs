use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use bookworm::api::types::Book;
use bookworm::api::ApiClient;
use bookworm::config::Config;
use bookworm::feed::{Feed, FetchOutcome};
use bookworm::images::{fallback_avatar_url, optimized_image_url};
use bookworm::logging::init_tracing;
use bookworm::profile::Shelf;
use bookworm::routing::{route_redirect, Area};
use bookworm::session::{FileSessionStore, Session};

#[derive(Parser)]
#[command(name = "bookworm", about = "Bookworm book-recommendation client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in.
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Sign in with existing credentials.
    Login { email: String, password: String },
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Browse the community feed.
    Feed {
        /// How many pages to load (the first, plus load-more steps).
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List your own recommendations.
    Shelf,
    /// Delete one of your recommendations.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load().context("loading configuration")?;
    let api = Arc::new(ApiClient::new(&config.api.base_url));
    let session = Session::new(Arc::clone(&api), Arc::new(FileSessionStore::new()));
    session.check_auth().await;

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            session.register(&username, &email, &password).await?;
            println!("Account created. Signed in as {username}.");
        }
        Command::Login { email, password } => {
            session.login(&email, &password).await?;
            let username = session.user().map(|u| u.username).unwrap_or_default();
            println!("Signed in as {username}.");
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            ensure_signed_in(&session)?;
            let Some(user) = session.user() else {
                bail!("not signed in; run `bookworm login` first");
            };
            let avatar = user
                .profile_image
                .unwrap_or_else(|| fallback_avatar_url(&user.username));
            println!("{} <{}>", user.username, user.email);
            println!("avatar: {}", optimized_image_url(&avatar, 100));
        }
        Command::Feed { pages } => {
            ensure_signed_in(&session)?;
            let feed = Feed::new(
                Arc::clone(&api),
                session.clone(),
                config.pacing(),
                config.api.page_size,
            );

            if let FetchOutcome::Failed(err) = feed.fetch_page(1, false).await {
                bail!("failed to load feed: {err}");
            }
            for _ in 1..pages {
                match feed.load_more().await {
                    Some(FetchOutcome::Fetched) => {}
                    Some(FetchOutcome::Failed(err)) => bail!("failed to load more: {err}"),
                    Some(FetchOutcome::InFlight) | None => break,
                }
            }

            let state = feed.state();
            if state.items.is_empty() {
                println!("No recommendations yet. Be the first to share a book!");
            }
            for book in &state.items {
                print_book(book);
            }
            if state.has_more {
                println!("... more available (loaded up to page {})", state.page);
            }
        }
        Command::Shelf => {
            ensure_signed_in(&session)?;
            let shelf = Shelf::new(Arc::clone(&api), session.clone(), config.pacing());
            if let Err(err) = shelf.fetch().await {
                bail!("failed to load your recommendations: {}", err.user_message());
            }

            let state = shelf.state();
            println!("Your recommendations: {}", state.items.len());
            for book in &state.items {
                print_book(book);
            }
        }
        Command::Delete { id, yes } => {
            ensure_signed_in(&session)?;
            if !yes && !confirm("Are you sure you want to delete this recommendation?")? {
                println!("Cancelled.");
                return Ok(());
            }

            let shelf = Shelf::new(Arc::clone(&api), session.clone(), config.pacing());
            match shelf.delete(&id).await {
                Ok(()) => println!("Recommendation deleted successfully!"),
                Err(err) => bail!("failed to delete recommendation: {}", err.user_message()),
            }
        }
    }

    Ok(())
}

/// The CLI analogue of the routing guard: commands inside the
/// signed-in area refuse to run when the session would be redirected
/// out of it.
fn ensure_signed_in(session: &Session) -> Result<()> {
    if route_redirect(session.phase(), Some(Area::Tabs)) == Some(Area::Auth) {
        bail!("not signed in; run `bookworm login` first");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn print_book(book: &Book) {
    let stars: String = (1u8..=5)
        .map(|i| if i <= book.rating { '*' } else { '-' })
        .collect();
    let author = book
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or("unknown");
    println!("[{stars}] {} by {}", book.title, author);
    if !book.caption.is_empty() {
        println!("    {}", book.caption);
    }
    println!("    {}", optimized_image_url(&book.image, 600));
}

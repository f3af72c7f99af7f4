use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spice_pilot::config::Config;
use spice_pilot::infrastructure::{FileStore, HttpGateway};
use spice_pilot::models::{FilterState, GenerationPreferences, Id, OAuthProvider, Tab};
use spice_pilot::services::PreferenceStore;
use spice_pilot::validation::{password_strength, LoginForm, PasswordChecks};
use spice_pilot::view::{GeneratedPanel, ListView, NoticeKind, RatingRow, RecipeCard, Screen};
use spice_pilot::{App, ClientError};

const USAGE: &str = "\
Usage: spice-pilot [--profile <name>] [--json] <command> [args]

Commands:
  list                              Show every recipe
  search <query>                    Search recipes on the server
  surprise                          Show a random selection
  show <id>                         Show one recipe in detail
  favorite <id>                     Toggle a favorite
  favorites                         Show favorite recipes
  filter [--difficulty X] [--spice X] [--cuisine X] [--vegan] [--vegetarian] [--gluten-free]
  options                           List cuisines and countries available for filtering
  generate <ingredient>... [--difficulty X] [--cuisine X]
  ai                                Show generated recipes
  rate <id> <1-5>                   Rate a recipe (requires login)
  login <email> <password> [--remember]
  oauth <google|facebook>           Print the sign-in URL for a provider
  strength <password>               Rate a password the way the signup form does
  logout
  whoami";

/// Pull `--name value` out of `args`
fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let pos = args.iter().position(|arg| arg == name)?;
    args.remove(pos);
    if pos < args.len() {
        Some(args.remove(pos))
    } else {
        None
    }
}

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|arg| arg == name) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn stars(row: &RatingRow) -> String {
    row.stars
        .iter()
        .map(|star| match (star.user_rated, star.active) {
            (true, _) => '*',
            (false, true) => '+',
            (false, false) => '.',
        })
        .collect()
}

fn print_card(card: &RecipeCard) {
    let favorite = if card.is_favorite { " [fav]" } else { "" };
    let badges: Vec<String> = card.badges.iter().map(|b| b.label()).collect();
    println!("#{} {}{}", card.id, card.name, favorite);
    println!(
        "    {} | {} | {} | {}",
        card.country,
        card.difficulty,
        card.prep_time,
        card.cuisine_type.as_deref().unwrap_or("-")
    );
    if !badges.is_empty() {
        println!("    {}", badges.join(", "));
    }
    println!("    {} {}", stars(&card.rating), card.rating.caption);
}

fn print_screen(screen: &Screen) {
    if let Some(profile) = &screen.profile {
        println!("[{}] {} <{}>", profile.initials, profile.full_name, profile.email);
    }

    if let Some(detail) = &screen.detail {
        let badges: Vec<String> = detail.badges.iter().map(|b| b.label()).collect();
        println!("#{} {}", detail.id, detail.name);
        println!("Image: {}", detail.image_url);
        println!(
            "{} | {} | {} | {}",
            detail.country,
            detail.difficulty,
            detail.prep_time,
            detail.cuisine_type.as_deref().unwrap_or("-")
        );
        if let Some(origin) = &detail.origin {
            println!("Origin: {}", origin);
        }
        if !badges.is_empty() {
            println!("{}", badges.join(", "));
        }
        println!("Rating: {} {}", stars(&detail.rating), detail.rating.caption);
        println!("\nHealth benefits: {}", detail.health_benefits);
        println!("\nIngredients:");
        for ingredient in &detail.ingredients {
            println!("  - {}", ingredient);
        }
        println!("\nSteps:");
        for (n, step) in detail.steps.iter().enumerate() {
            println!("  {}. {}", n + 1, step);
        }
        return;
    }

    if let Some(generated) = &screen.generated {
        match generated {
            GeneratedPanel::Generating { message, detail } => println!("{}\n{}", message, detail),
            GeneratedPanel::Ready(card) => {
                println!("Generated: {} ({}) [AI Generated]", card.name, card.id);
                if let Some(cuisine) = &card.cuisine_type {
                    println!("Cuisine: {}", cuisine);
                }
                println!("{}", card.description);
                println!("Ingredients: {}", card.ingredients.join(", "));
                for (n, step) in card.steps.iter().enumerate() {
                    println!("  {}. {}", n + 1, step);
                }
            }
            GeneratedPanel::Failed(state) => println!("{}\n{}", state.title, state.message),
        }
        println!();
    }

    match &screen.list {
        ListView::Cards(cards) => {
            println!("{} ({} recipes)", screen.tab, cards.len());
            cards.iter().for_each(print_card);
        }
        ListView::Empty(state) => println!("{}\n{}", state.title, state.message),
    }
}

async fn run(app: &App, command: &str, mut args: Vec<String>) -> Result<(), ClientError> {
    match command {
        "list" => app.switch_tab(Tab::All),
        "search" => app.search(&args.join(" ")).await,
        "surprise" => app.surprise().await,
        "show" => {
            let id = Id::from(args.first().cloned().unwrap_or_default());
            app.show_details(&id).await?;
            if app.current_user().is_some() && !id.is_generated() {
                // The ratings breakdown only refines the star row
                let _ = app.load_reviews(&id).await;
            }
        }
        "favorite" => {
            let id = Id::from(args.first().cloned().unwrap_or_default());
            let now = app.toggle_favorite(&id);
            println!(
                "{} {} favorites",
                if now { "Added" } else { "Removed" },
                if now { "to" } else { "from" }
            );
            app.switch_tab(Tab::Favorites);
        }
        "favorites" => app.switch_tab(Tab::Favorites),
        "ai" => app.switch_tab(Tab::AiGenerated),
        "filter" => {
            let mut filters = FilterState::default();
            if let Some(difficulty) = take_option(&mut args, "--difficulty") {
                filters = filters.with_difficulty(difficulty);
            }
            if let Some(spice) = take_option(&mut args, "--spice") {
                filters = filters.with_spice_level(spice);
            }
            if let Some(cuisine) = take_option(&mut args, "--cuisine") {
                filters = filters.with_cuisine_type(cuisine);
            }
            filters.vegan = take_flag(&mut args, "--vegan");
            filters.vegetarian = take_flag(&mut args, "--vegetarian");
            filters.gluten_free = take_flag(&mut args, "--gluten-free");
            app.apply_filters(filters);
        }
        "options" => {
            let options = app.filter_options().await?;
            println!("Cuisines: {}", options.cuisines.join(", "));
            println!("Countries: {}", options.countries.join(", "));
        }
        "generate" => {
            let preferences = GenerationPreferences {
                difficulty: take_option(&mut args, "--difficulty").unwrap_or_default(),
                cuisine: take_option(&mut args, "--cuisine").unwrap_or_default(),
            };
            for ingredient in &args {
                app.add_ingredient(ingredient);
            }
            app.generate_recipe(preferences).await?;
        }
        "rate" => {
            let id = Id::from(args.first().cloned().unwrap_or_default());
            let value = args
                .get(1)
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(|| ClientError::Guard("Rating must be a number from 1 to 5".into()))?;
            app.rate(&id, value).await?;
        }
        "login" => {
            let remember_me = take_flag(&mut args, "--remember");
            let form = LoginForm {
                email: args.first().cloned().unwrap_or_default(),
                password: args.get(1).cloned().unwrap_or_default(),
                remember_me,
            };
            let user = app.login(&form).await?;
            println!("Signed in as {} <{}>", user.full_name(), user.email);
        }
        "logout" => app.logout().await?,
        "whoami" => match app.current_user() {
            Some(user) => println!(
                "{} <{}> ({:?})",
                user.full_name(),
                user.email,
                app.session_status()
            ),
            None => println!("Not signed in"),
        },
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            return Err(ClientError::Guard(format!("Unknown command: {}", other)));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spice_pilot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(profile) = take_option(&mut args, "--profile") {
        // SAFETY: set before any other code reads the environment
        unsafe { std::env::set_var("PROFILE", profile) };
    }
    let json = take_flag(&mut args, "--json");

    if args.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }
    let command = args.remove(0);

    if command == "strength" {
        let strength = password_strength(args.first().map(String::as_str).unwrap_or_default());
        println!(
            "{} ({}/{})",
            strength.level.hint(),
            strength.score,
            PasswordChecks::MAX_SCORE
        );
        return ExitCode::SUCCESS;
    }

    let config = Config::from_env();

    let gateway = match HttpGateway::from_config(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if command == "oauth" {
        return match args.first().map(|p| p.parse::<OAuthProvider>()) {
            Some(Ok(provider)) => {
                println!(
                    "Sign in with {}: {}",
                    provider.display_name(),
                    gateway.oauth_url(provider)
                );
                ExitCode::SUCCESS
            }
            Some(Err(e)) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
            None => {
                eprintln!("{}", USAGE);
                ExitCode::FAILURE
            }
        };
    }

    let store = Arc::new(FileStore::open(&config.store_path));
    tracing::debug!("Using preferences at {:?}", store.path());
    let preferences = PreferenceStore::new(store);
    let app = App::new(gateway.clone(), gateway, preferences);

    let status = app.start().await;
    tracing::debug!("Session status after start: {:?}", status);

    let outcome = run(&app, &command, args).await;

    let screen = app.view();
    if json {
        match serde_json::to_string_pretty(&screen) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!("Failed to encode screen: {}", e),
        }
    } else if !matches!(command.as_str(), "options" | "whoami" | "login" | "logout") {
        print_screen(&screen);
    }

    for notice in app.take_notices() {
        match notice.kind {
            NoticeKind::Error => eprintln!("! {}", notice.message),
            NoticeKind::Info => println!("i {}", notice.message),
            NoticeKind::Success => println!("+ {}", notice.message),
        }
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

use log::{debug, error};
use std::env;
use std::process;

use findmyrecipe::discovery::DiscoverySnapshot;
use findmyrecipe::{
    ClientError, FilterCategory, FilterSelection, FindMyRecipe, NewRecipe, RecipeSummary,
};

const USAGE: &str = "Usage: findmyrecipe <command> [args]

Commands:
  browse [--query TEXT] [--cuisine X] [--course X] [--diet X] [--pages N]
  options <cuisine|course|diet>
  show <id-or-name>
  similar <name>
  ingredients <ingredient>...
  upload <title> <ingredients> <instructions> [image-url]
  login <email> <password>
  whoami

Configuration is read from findmyrecipe.toml and FINDMYRECIPE__* variables.";

struct BrowseArgs {
    query: String,
    filters: FilterSelection,
    pages: u32,
}

fn parse_browse(args: &[String]) -> Result<BrowseArgs, String> {
    let mut browse = BrowseArgs {
        query: String::new(),
        filters: FilterSelection::new(),
        pages: 1,
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        match flag.as_str() {
            "--query" | "-q" => browse.query = value.clone(),
            "--pages" => {
                browse.pages = value
                    .parse()
                    .map_err(|_| format!("Invalid page count: {}", value))?
            }
            other => {
                let category: FilterCategory = other
                    .trim_start_matches("--")
                    .parse()
                    .map_err(|e: ClientError| e.to_string())?;
                browse.filters.toggle(category, value.as_str());
            }
        }
    }
    Ok(browse)
}

fn print_recipes(recipes: &[RecipeSummary]) {
    for recipe in recipes {
        let tags: Vec<&str> = [&recipe.cuisine, &recipe.course, &recipe.diet]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .collect();
        match &recipe.prep_time {
            Some(time) => println!("{}  [{}]  {} min", recipe.name, tags.join(", "), time),
            None => println!("{}  [{}]", recipe.name, tags.join(", ")),
        }
    }
}

fn print_snapshot(snapshot: &DiscoverySnapshot) {
    print_recipes(&snapshot.recipes);
    if let Some(notice) = snapshot.notice() {
        println!("{}", notice);
    }
    if snapshot.show_load_more() {
        println!("(more available: use --pages {})", snapshot.cursor.next_page);
    }
}

async fn browse(app: &FindMyRecipe, args: BrowseArgs) {
    let view = app.discovery_with_filters(args.filters);
    view.mount().await;
    if !args.query.trim().is_empty() {
        view.set_query(args.query);
        view.submit_query().await;
    }
    for _ in 1..args.pages {
        if !view.load_more().await {
            break;
        }
    }
    print_snapshot(&view.snapshot());
}

async fn run(app: FindMyRecipe, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let command = args.first().map(String::as_str).ok_or(USAGE)?;
    let rest = &args[1..];
    debug!("Running {} against {}", command, app.config().base_url);

    match command {
        "browse" | "search" => browse(&app, parse_browse(rest)?).await,
        "options" => {
            let category: FilterCategory = rest.first().ok_or(USAGE)?.parse()?;
            let view = app.discovery();
            view.mount().await;
            for option in view.snapshot().options.get(category) {
                println!("{}", option);
            }
        }
        "show" => {
            let recipe = app.recipes().recipe(rest.first().ok_or(USAGE)?).await?;
            println!("{}", recipe.summary.name);
            if let Some(description) = &recipe.description {
                println!("\n{}", description);
            }
            println!("\nIngredients:");
            for ingredient in &recipe.ingredients {
                println!("  - {}", ingredient);
            }
            println!("\nSteps:");
            for (i, step) in recipe.steps().iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
        }
        "similar" => {
            let name = rest.first().ok_or(USAGE)?;
            print_recipes(&app.recipes().similar_recipes(name).await?);
        }
        "ingredients" => {
            let mut search = app.ingredient_search();
            for ingredient in rest {
                search.add(ingredient.as_str());
            }
            search.search().await;
            print_recipes(search.recipes());
            if let Some(message) = search.error() {
                println!("{}", message);
            }
        }
        "upload" => {
            let [title, ingredients, instructions, ..] = rest else {
                return Err(USAGE.into());
            };
            let recipe = NewRecipe {
                title: title.clone(),
                ingredients: NewRecipe::parse_ingredients(ingredients),
                instructions: instructions.clone(),
                image_url: rest.get(3).cloned().unwrap_or_default(),
            };
            app.recipes().upload_recipe(&recipe).await?;
            println!("Recipe uploaded successfully!");
        }
        "login" => {
            let [email, password, ..] = rest else {
                return Err(USAGE.into());
            };
            let auth = app.auth();
            println!("{}", auth.login(email, password).await?);
            if let Some(token) = app.session().token() {
                println!("export FINDMYRECIPE__TOKEN={}", token);
            }
        }
        "whoami" => {
            let user = app.auth().whoami().await?;
            println!("{} <{}>", user.name, user.email);
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                println!("{}", bio);
            }
            if let Some(avatar) = user.avatar_url(&app.config().base_url) {
                println!("avatar: {}", avatar);
            }
        }
        other => return Err(format!("Unknown command: {}\n\n{}", other, USAGE).into()),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let app = match FindMyRecipe::builder().build() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to configure client: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(app, &args).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

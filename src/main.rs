use recipe_sync::{
    orchestrator_from_config, refresh_library, LibraryStats, Recipe, RecipeStore, SyncConfig,
    CATEGORY_FILTERS,
};
use std::env;

const USAGE: &str = "Usage: recipe-sync <command>

Commands:
  sync                      Seed, import bundled samples and pull online recipes
  list [category] [search]  List recipes, favorites first
  favorite <id>             Toggle the favorite flag
  cooked <id>               Mark a recipe as cooked now
  categories                Show the available category filters";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(USAGE)?;

    let config = SyncConfig::load()?;
    let mut store = RecipeStore::open(&config.database_path)?;

    match command.as_str() {
        "sync" => {
            let orchestrator = orchestrator_from_config(&config)?;
            let report = refresh_library(&mut store, &orchestrator, &config).await?;
            for bucket in &report.buckets {
                let note = if bucket.list_failed { " (listing failed)" } else { "" };
                println!(
                    "{}: {} recipes{}",
                    bucket.bucket.label(),
                    bucket.records.len(),
                    note
                );
            }
            print_stats(&store.query(None, None)?);
        }
        "list" => {
            let category = args.get(1).map(String::as_str);
            let search = (args.len() > 2).then(|| args[2..].join(" "));
            let recipes = store.query(search.as_deref(), category)?;
            for recipe in &recipes {
                print_recipe(recipe);
            }
            print_stats(&recipes);
        }
        "favorite" => {
            let id = args.get(1).ok_or("Please provide a recipe id")?;
            match store.toggle_favorite(id)? {
                Some(recipe) => print_recipe(&recipe),
                None => eprintln!("No recipe with id {id}"),
            }
        }
        "cooked" => {
            let id = args.get(1).ok_or("Please provide a recipe id")?;
            match store.mark_cooked(id)? {
                Some(recipe) => print_recipe(&recipe),
                None => eprintln!("No recipe with id {id}"),
            }
        }
        "categories" => {
            for category in CATEGORY_FILTERS {
                println!("{category}");
            }
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    let star = if recipe.is_favorite { "*" } else { " " };
    println!(
        "{} {:<40} {:<12} {}",
        star,
        recipe.title,
        recipe.category.as_deref().unwrap_or("-"),
        recipe.id
    );
}

fn print_stats(recipes: &[Recipe]) {
    let stats = LibraryStats::of(recipes);
    println!("{} recipes • {} favorites", stats.recipes, stats.favorites);
}

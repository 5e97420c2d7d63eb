use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use launchdeck::catalog::{CategoryId, DEFAULT_ICON};
use launchdeck::scanner::default_app_directories;
use launchdeck::{
    AppSource, CategoryStore, DirectoryScanner, DirectoryWatcher, FileStore, KeyValueStore,
    LauncherSettings, group_by_category,
};

#[derive(Parser)]
#[command(name = "launchdeck", version, about = "Categorize installed applications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show installed applications grouped by category
    List {
        /// Only show apps whose name contains this text
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print the automatic category key for an application name
    Classify {
        name: String,
        #[arg(short, long, default_value = "")]
        path: String,
    },
    /// List categories with their ids
    Categories,
    /// Create a category
    Add {
        name: String,
        #[arg(short, long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// Rename a category (built-in categories become user categories)
    Rename {
        id: CategoryId,
        name: String,
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Delete a category and every assignment pointing at it
    Delete { id: CategoryId },
    /// Assign an application to a category, or `none` to clear
    Assign { path: String, category: String },
    /// Restore the built-in categories and drop all assignments
    Reset,
    /// Show the configured launcher hotkey
    Hotkey,
    /// Re-list applications whenever the application directories change
    Watch,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let backend = FileStore::open_default()?;
    let settings = LauncherSettings::load(&backend);
    let mut store = CategoryStore::open(backend);

    match cli.command {
        Command::List { query } => {
            let apps = DirectoryScanner::default().scan_applications();
            print_groups(&store, &apps, &query);
        }
        Command::Classify { name, path } => {
            println!("{}", store.classify(&name, &path));
        }
        Command::Categories => {
            for category in store.categories() {
                let origin = if category.is_builtin() { "built-in" } else { "user" };
                println!(
                    "{}  {:<24} {:<22} {:<8} {}",
                    category.id,
                    category.name,
                    category.icon,
                    origin,
                    category.key().unwrap_or("-")
                );
            }
        }
        Command::Add { name, icon } => {
            let category = store.add(&name, &icon);
            println!("{}", category.id);
        }
        Command::Rename { id, name, icon } => {
            let Some(mut category) = store.get(id).cloned() else {
                bail!("no category with id {}", id);
            };
            category.name = name;
            if let Some(icon) = icon {
                category.icon = icon;
            }
            store.update(category);
        }
        Command::Delete { id } => {
            if store.delete(id).is_none() {
                bail!("no category with id {}", id);
            }
        }
        Command::Assign { path, category } => {
            let id = match category.as_str() {
                "none" => None,
                other => Some(
                    other
                        .parse::<CategoryId>()
                        .with_context(|| format!("invalid category id '{}'", other))?,
                ),
            };
            if !store.set_override(&path, id) {
                bail!("no category with id {}", category);
            }
        }
        Command::Reset => store.reset_to_defaults(),
        Command::Hotkey => println!("{}", settings.hotkey_description()),
        Command::Watch => watch(&store)?,
    }

    store.close();
    Ok(())
}

fn print_groups<S: KeyValueStore>(
    store: &CategoryStore<S>,
    apps: &[launchdeck::AppEntry],
    query: &str,
) {
    for group in group_by_category(store, apps, query) {
        println!("{} ({})", group.category.name, group.len());
        for app in &group.apps {
            println!("    {:<32} {}", app.name, app.path);
        }
    }
}

fn watch<S: KeyValueStore>(store: &CategoryStore<S>) -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = DirectoryWatcher::new(default_app_directories());
    watcher.start(move || {
        let _ = tx.send(());
    })?;

    let scanner = DirectoryScanner::default();
    print_groups(store, &scanner.scan_applications(), "");

    for () in rx {
        log::info!("Application directories changed, rescanning");
        print_groups(store, &scanner.scan_applications(), "");
    }

    watcher.stop();
    Ok(())
}

mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::{self, BufReader};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use adapter::terminal::{format_details, format_summary};
use cli::{parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{emit, LogLevel, LogRecord};
use domain::RecipesCommand;
use ports::inbound::UseCaseRunner;
use usecase::DeleteOutcome;
use wiring::{wire_recipes, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let command_name = config.command.name();
        emit(
            self.app.logger.as_ref(),
            LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = self.dispatch(config.command);

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        emit(
            self.app.logger.as_ref(),
            LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            emit(
                self.app.logger.as_ref(),
                LogRecord::new(LogLevel::Error, e.to_string()).layer("cli").kind("error"),
            );
        }
        result
    }
}

impl Runner {
    fn dispatch(&self, command: RecipesCommand) -> Result<i32, Error> {
        let uc = &self.app.recipes_use_case;
        match command {
            RecipesCommand::Help => {
                print_help();
                Ok(0)
            }
            RecipesCommand::List { query } => {
                let recipes = uc.list(&query)?;
                if recipes.is_empty() {
                    println!("(no recipes)");
                }
                for recipe in &recipes {
                    println!("{}", format_summary(recipe));
                }
                Ok(0)
            }
            RecipesCommand::Show { id } => {
                print!("{}", format_details(&uc.show(&id)?));
                Ok(0)
            }
            RecipesCommand::Create { draft } => {
                let created = uc.create(draft)?;
                println!("Created {}", format_summary(&created));
                Ok(0)
            }
            RecipesCommand::Update { id, patch } => {
                let updated = uc.update(&id, patch)?;
                println!("Updated {}", format_summary(&updated));
                Ok(0)
            }
            RecipesCommand::Delete { id, assume_yes } => match uc.delete(&id, assume_yes)? {
                DeleteOutcome::Deleted(Some(removed)) => {
                    println!("Deleted {} ({})", removed.id, removed.title);
                    Ok(0)
                }
                DeleteOutcome::Deleted(None) => {
                    println!("Deleted {}", id);
                    Ok(0)
                }
                DeleteOutcome::Declined => {
                    println!("Not deleted.");
                    Ok(1)
                }
            },
            RecipesCommand::Favorite { id } => {
                let recipe = uc.toggle_favorite(&id)?;
                let verb = if recipe.is_favorite { "Favorited" } else { "Unfavorited" };
                println!("{} {}", verb, format_summary(&recipe));
                Ok(0)
            }
            RecipesCommand::Browse { filter, debounce_ms } => {
                let debounce = debounce_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| self.app.settings.debounce());
                eprintln!("Type to search. :all / :fav / :unfav change the filter, :q quits.");
                uc.browse(
                    Arc::clone(&self.app.list_view),
                    filter,
                    debounce,
                    BufReader::new(io::stdin()),
                )?;
                Ok(0)
            }
        }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("recipes: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: recipes [-h] [--api-url URL] [--db PATH] [-v] [--no-interactive] <command> [args...]");
}

fn print_help() {
    println!("Usage: recipes [-h] [--api-url URL] [--db PATH] [-v] [--no-interactive] <command> [args...]");
    println!("  -h, --help            Display this help message.");
    println!("  --api-url URL         Backend base URL (default: http://localhost:3000).");
    println!("  --db PATH             Read and write a local db.json instead of the REST backend.");
    println!("  -v, --verbose         Emit debug logs to stderr.");
    println!("  --no-interactive      Never prompt; delete then needs -y.");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish).");
    println!();
    println!("Environment:");
    println!("  RECIPES_HOME      Home directory (config.json, log.jsonl). Default: $XDG_CONFIG_HOME/recipes or ~/.config/recipes.");
    println!("  RECIPES_API_URL   Backend base URL (overrides config.json, overridden by --api-url).");
    println!();
    println!("Commands:");
    println!("  list [-q text] [-f filter]        List recipes (filter: all, favorited, unfavorited).");
    println!("  show <id>                         Show one recipe.");
    println!("  create --title .. --description .. --ingredient .. [--ingredient ..]");
    println!("         --instructions .. --image-url .. [--favorite]");
    println!("                                    Create a recipe.");
    println!("  update <id> [fields..] [--favorite true|false]");
    println!("                                    Edit a recipe; omitted fields keep their value.");
    println!("  delete <id> [-y]                  Delete a recipe (asks first unless -y).");
    println!("  favorite <id>                     Toggle the favorite flag.");
    println!("  browse [-f filter] [--debounce-ms N]");
    println!("                                    Search interactively from stdin lines.");
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
        ParseOutcome::Message(text) => {
            print!("{}", text);
            return Ok(0);
        }
    };
    let app = wire_recipes(&config)?;
    let runner = Runner { app };
    runner.run(config)
}

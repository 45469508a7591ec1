use crate::domain::{FavoriteFilter, RecipeDraft, RecipeId, RecipePatch, RecipeQuery, RecipesCommand};
use clap::builder::ArgAction;
use clap::error::ErrorKind;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

/// CLI から受け取った設定
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verbose: bool,
    /// 削除確認を出さない（確認が必要なら中止）
    pub non_interactive: bool,
    pub api_url: Option<String>,
    /// 指定時は REST ではなくこの db.json を直接読み書きする
    pub db: Option<PathBuf>,
    pub command: RecipesCommand,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            non_interactive: false,
            api_url: None,
            db: None,
            command: RecipesCommand::Help,
        }
    }
}

/// 解析結果: 通常の Config、補完スクリプト生成、またはサブコマンドのヘルプ文
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
    /// `recipes list --help` など clap が組み立てた表示用テキスト
    Message(String),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Backend base URL (default: http://localhost:3000)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("db")
                .long("db")
                .value_name("PATH")
                .help("Read and write a local db.json instead of the REST backend")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit debug logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-interactive")
                .long("no-interactive")
                .help("Never prompt; destructive commands need -y")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn id_arg() -> clap::Arg {
    clap::Arg::new("id").value_name("id").required(true).num_args(1)
}

fn filter_arg() -> clap::Arg {
    clap::Arg::new("filter")
        .short('f')
        .long("filter")
        .value_name("all|favorited|unfavorited")
        .num_args(1)
}

/// create / update 共通のフィールド指定
fn recipe_field_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(clap::Arg::new("title").long("title").num_args(1))
        .arg(clap::Arg::new("description").long("description").num_args(1))
        .arg(
            clap::Arg::new("ingredient")
                .long("ingredient")
                .value_name("text")
                .help("Repeat for each ingredient (order is kept)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(clap::Arg::new("instructions").long("instructions").num_args(1))
        .arg(clap::Arg::new("image-url").long("image-url").value_name("URL").num_args(1))
}

fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("recipes")
            .about("Browse and manage recipes on a json-server style backend")
            .subcommand_required(false)
            .disable_help_subcommand(true)
            .subcommand(clap::Command::new("help").about("Display this help message"))
            .subcommand(
                clap::Command::new("list")
                    .about("List recipes once")
                    .arg(clap::Arg::new("query").short('q').long("query").value_name("text").num_args(1))
                    .arg(filter_arg()),
            )
            .subcommand(clap::Command::new("show").about("Show one recipe").arg(id_arg()))
            .subcommand(recipe_field_args(
                clap::Command::new("create").about("Create a recipe").arg(
                    clap::Arg::new("favorite")
                        .long("favorite")
                        .help("Mark as favorite")
                        .action(ArgAction::SetTrue),
                ),
            ))
            .subcommand(recipe_field_args(
                clap::Command::new("update")
                    .about("Edit a recipe; omitted fields keep their value")
                    .arg(id_arg())
                    .arg(
                        clap::Arg::new("favorite")
                            .long("favorite")
                            .value_name("true|false")
                            .value_parser(value_parser!(bool))
                            .num_args(1),
                    ),
            ))
            .subcommand(
                clap::Command::new("delete")
                    .about("Delete a recipe")
                    .arg(id_arg())
                    .arg(
                        clap::Arg::new("yes")
                            .short('y')
                            .long("yes")
                            .help("Do not ask for confirmation")
                            .action(ArgAction::SetTrue),
                    ),
            )
            .subcommand(clap::Command::new("favorite").about("Toggle the favorite flag").arg(id_arg()))
            .subcommand(
                clap::Command::new("browse")
                    .about("Search interactively: type text lines, :all/:fav/:unfav to filter, :q to quit")
                    .arg(filter_arg())
                    .arg(
                        clap::Arg::new("debounce-ms")
                            .long("debounce-ms")
                            .value_name("ms")
                            .value_parser(value_parser!(u64))
                            .num_args(1),
                    ),
            ),
    )
}

fn string_of(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name).cloned()
}

fn filter_of(m: &clap::ArgMatches) -> Result<FavoriteFilter, Error> {
    m.get_one::<String>("filter")
        .map(|s| s.parse())
        .transpose()
        .map(Option::unwrap_or_default)
}

fn id_of(m: &clap::ArgMatches) -> RecipeId {
    RecipeId::new(m.get_one::<String>("id").cloned().unwrap_or_default())
}

fn ingredients_of(m: &clap::ArgMatches) -> Option<Vec<String>> {
    m.get_many::<String>("ingredient").map(|i| i.cloned().collect())
}

fn matches_to_command(matches: &clap::ArgMatches) -> Result<RecipesCommand, Error> {
    if matches.get_flag("help") {
        return Ok(RecipesCommand::Help);
    }
    let command = match matches.subcommand() {
        None | Some(("help", _)) => RecipesCommand::Help,
        Some(("list", m)) => RecipesCommand::List {
            query: RecipeQuery::new(string_of(m, "query").unwrap_or_default(), filter_of(m)?),
        },
        Some(("show", m)) => RecipesCommand::Show { id: id_of(m) },
        Some(("create", m)) => RecipesCommand::Create {
            draft: RecipeDraft {
                title: string_of(m, "title").unwrap_or_default(),
                description: string_of(m, "description").unwrap_or_default(),
                ingredients: ingredients_of(m).unwrap_or_default(),
                instructions: string_of(m, "instructions").unwrap_or_default(),
                image_url: string_of(m, "image-url").unwrap_or_default(),
                is_favorite: m.get_flag("favorite"),
            },
        },
        Some(("update", m)) => RecipesCommand::Update {
            id: id_of(m),
            patch: RecipePatch {
                title: string_of(m, "title"),
                description: string_of(m, "description"),
                ingredients: ingredients_of(m),
                instructions: string_of(m, "instructions"),
                image_url: string_of(m, "image-url"),
                is_favorite: m.get_one::<bool>("favorite").copied(),
            },
        },
        Some(("delete", m)) => RecipesCommand::Delete {
            id: id_of(m),
            assume_yes: m.get_flag("yes"),
        },
        Some(("favorite", m)) => RecipesCommand::Favorite { id: id_of(m) },
        Some(("browse", m)) => RecipesCommand::Browse {
            filter: filter_of(m)?,
            debounce_ms: m.get_one::<u64>("debounce-ms").copied(),
        },
        Some((name, _)) => {
            return Err(Error::invalid_argument(format!("Command '{}' is not implemented.", name)))
        }
    };
    Ok(command)
}

fn matches_to_config(matches: &clap::ArgMatches) -> Result<Config, Error> {
    Ok(Config {
        verbose: matches.get_flag("verbose"),
        non_interactive: matches.get_flag("no-interactive"),
        api_url: string_of(matches, "api-url"),
        db: matches.get_one::<PathBuf>("db").cloned(),
        command: matches_to_command(matches)?,
    })
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 引数列から解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = match build_clap_command().try_get_matches_from(args) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => return Ok(ParseOutcome::Message(e.to_string())),
        Err(e) => return Err(Error::invalid_argument(e.to_string())),
    };

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)?))
}

/// 補完スクリプトを標準出力に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "recipes", &mut std::io::stdout());
}

pub mod args;

pub use args::{parse_args, parse_args_from, print_completion, Config, ParseOutcome};

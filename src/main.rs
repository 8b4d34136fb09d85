// Tue Jan 13 2026 - Alex

use anyhow::Context;
use clap::{ArgAction, Parser};
use colored::Colorize;
use indexmap::IndexMap;
use log::info;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use verbline::{
    command_enum,
    console::{Banner, Console, ErrorDisplay, ScriptSource, StdinSource, StdoutSink},
    utils::{pluralize, LoggingUtils},
    ArgumentDescriptor, CommandDef, CommandManager, ConsoleConfig, TypeInfo,
};

#[derive(Parser, Debug)]
#[command(name = "verbline")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Interactive line-oriented command console", long_about = None)]
struct Args {
    /// JSON console configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    log_level: Option<String>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    no_color: bool,

    #[arg(long)]
    no_banner: bool,

    /// Run these lines instead of reading stdin
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Keep,
}

command_enum!(Case { Upper => "upper", Lower => "lower", Keep => "keep" });

const MAX_REPEAT: u32 = 1000;

type Store = Arc<Mutex<IndexMap<String, String>>>;

fn build_commands() -> anyhow::Result<CommandManager> {
    let mut manager = CommandManager::new();
    manager.add_help_command()?;

    manager.register(
        CommandDef::new("echo")
            .with_description("Print the arguments, one per line")
            .with_argument(
                ArgumentDescriptor::text("words")
                    .with_description("words to print")
                    .params()
                    .optional(),
            )
            .with_example("echo 'two words' \\x41")
            .with_handler(|args| Ok(Some(args.list::<String>(0).join("\n")))),
    )?;

    manager.register(
        CommandDef::new("add")
            .with_alias("sum")
            .with_description("Add integers")
            .with_argument(
                ArgumentDescriptor::new("numbers", TypeInfo::parsed::<i64>())
                    .with_description("integers to add")
                    .params(),
            )
            .with_example("add 1 2 -3")
            .with_handler(|args| {
                let total: i64 = args.list::<i64>(0).iter().sum();
                Ok(Some(total.to_string()))
            }),
    )?;

    manager.register(
        CommandDef::new("say")
            .with_description("Repeat a sentence")
            .with_argument(
                ArgumentDescriptor::new("times", TypeInfo::parsed::<u32>())
                    .with_description("how many times"),
            )
            .with_argument(
                ArgumentDescriptor::new("case", TypeInfo::enumeration::<Case>())
                    .with_description("letter case")
                    .with_default("keep"),
            )
            .with_argument(
                ArgumentDescriptor::text("text")
                    .with_description("the sentence")
                    .join_rest()
                    .optional(),
            )
            .with_example("say 2 upper hello there")
            .with_handler(|args| {
                let times = *args.require::<u32>(0)?;
                if times > MAX_REPEAT {
                    anyhow::bail!("say: at most {} repetitions, got {}", MAX_REPEAT, times);
                }
                let text = args.text(2).unwrap_or("");
                let text = match args.require::<Case>(1)? {
                    Case::Upper => text.to_uppercase(),
                    Case::Lower => text.to_lowercase(),
                    Case::Keep => text.to_string(),
                };
                Ok(Some(vec![text; times as usize].join("\n")))
            }),
    )?;

    manager.register(
        CommandDef::new("raw")
            .with_description("Show the rest of the line exactly as typed")
            .raw()
            .with_argument(ArgumentDescriptor::text("line").with_description("untouched input"))
            .with_example("raw 'not' \\tokenized")
            .with_handler(|args| Ok(args.text(0).map(|line| format!("[{}]", line)))),
    )?;

    let store: Store = Arc::new(Mutex::new(IndexMap::new()));
    let kv = manager.add_verb(CommandDef::new("kv").with_description("In-memory key/value store"))?;

    let set_store = store.clone();
    kv.register(
        CommandDef::new("set")
            .with_description("Store a value")
            .with_argument(ArgumentDescriptor::text("key"))
            .with_argument(ArgumentDescriptor::text("value").join_rest())
            .with_example("kv set greeting hello world")
            .with_handler(move |args| {
                let key = args.require::<String>(0)?.clone();
                let value = args.require::<String>(1)?.clone();
                set_store.lock().insert(key, value);
                Ok(None)
            }),
    )?;

    let get_store = store.clone();
    kv.register(
        CommandDef::new("get")
            .with_description("Print a stored value")
            .with_argument(ArgumentDescriptor::text("key"))
            .with_handler(move |args| {
                let key = args.require::<String>(0)?;
                get_store
                    .lock()
                    .get(key)
                    .cloned()
                    .map(Some)
                    .with_context(|| format!("no value stored under '{}'", key))
            }),
    )?;

    let list_store = store;
    kv.register(
        CommandDef::new("list")
            .with_alias("ls")
            .with_description("Print every key in insertion order")
            .with_handler(move |_| {
                let keys: Vec<String> = list_store.lock().keys().cloned().collect();
                Ok(Some(keys.join("\n")))
            }),
    )?;

    Ok(manager)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let display = ErrorDisplay::for_terminal(!args.no_color);

    let mut config = match &args.config {
        Some(path) if !path.exists() => {
            eprintln!(
                "{}",
                display.format_warning(&format!("{} not found, using defaults", path.display()))
            );
            ConsoleConfig::default()
        }
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    if args.no_color {
        config = config.with_color(false);
    }
    if args.no_banner || !args.commands.is_empty() {
        config = config.with_banner(false);
    }

    let level_name = args.log_level.as_deref().or(config.log_level.as_deref());
    LoggingUtils::init_logger(LoggingUtils::resolve_level(level_name, args.verbose));

    if !config.color {
        colored::control::set_override(false);
    }

    let manager = build_commands()?;
    info!("{} registered", pluralize(manager.len(), "command", "commands"));

    let banner = Banner::new("verbline")
        .with_subtitle("type 'help' for commands")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_color(config.color);
    let console = Console::new(&manager, config).with_banner(banner);

    let summary = if args.commands.is_empty() {
        let mut source = StdinSource::new().with_prompt(&console.config().prompt);
        console.run(&mut source, &mut StdoutSink)?
    } else {
        let mut source = ScriptSource::new(args.commands.iter().cloned());
        console.run(&mut source, &mut StdoutSink)?
    };

    if !summary.is_clean() {
        eprintln!(
            "{} {}",
            "[!]".red(),
            pluralize(summary.failed, "command failed", "commands failed")
        );
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbline::console::MemorySink;

    fn run(lines: &[&str]) -> Vec<String> {
        let manager = build_commands().unwrap();
        let config = ConsoleConfig::default().with_color(false);
        let console = Console::new(&manager, config);
        let mut sink = MemorySink::new();
        console
            .run(&mut ScriptSource::new(lines.iter().copied()), &mut sink)
            .unwrap();
        sink.lines()
    }

    #[test]
    fn test_demo_commands() {
        assert_eq!(run(&["add 1 2 -3"]), vec!["0"]);
        assert_eq!(run(&["say 2 upper hi there"]), vec!["HI THERE", "HI THERE"]);
        assert_eq!(run(&["say 1 keep Hi"]), vec!["Hi"]);
        assert!(run(&["say 1001 keep x"])[0].starts_with("Error: say: at most 1000 repetitions"));
        assert!(run(&["say 1 hi"])[0].starts_with("Error: say: cannot convert 'hi'"));
        assert_eq!(run(&["raw  a 'b"]), vec!["[a 'b]"]);
    }

    #[test]
    fn test_kv_verb() {
        let out = run(&["kv set b 2", "kv set a one two", "kv ls", "kv get a"]);
        assert_eq!(out, vec!["b", "a", "one two"]);
    }
}

// Mon Jan 19 2026 - Alex

use crate::command::binder::Output;
use crate::command::error::{DispatchError, DispatchResult};
use crate::command::registry::{Action, Command, CommandManager};
use crate::command::tokenizer::tokenize;
use log::trace;

/// Split a trimmed line into the command word and the rest, with the separator removed.
pub fn split_command(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(index) => (&line[..index], line[index..].trim_start()),
        None => (line, ""),
    }
}

impl CommandManager {
    /// Dispatch one line of input.
    ///
    /// An empty line does nothing. Verbs re-dispatch the rest of the line on
    /// their own manager, one word per nesting level.
    pub fn execute(&self, line: &str) -> DispatchResult<Output> {
        let leading = line.len() - line.trim_start().len();
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = split_command(line);
        let command = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        trace!("dispatching '{}' ({:?})", name, rest);

        // byte offset of `rest` within the caller's line
        let base = leading + line.len() - rest.len();

        let result = match &command.action {
            Action::Verb(nested) => nested.execute(rest),
            Action::Invoke(invoker) if command.is_raw() => invoker.invoke(name, &[rest.to_string()]),
            Action::Invoke(invoker) => tokenize(rest)
                .map_err(DispatchError::from)
                .and_then(|tokens| invoker.invoke(name, &tokens)),
            Action::Help => tokenize(rest)
                .map_err(DispatchError::from)
                .and_then(|path| self.help_text(&path).map(Some)),
        };

        result.map_err(|err| err.rebased(base))
    }

    /// Follow a path of names through nested verbs.
    pub fn resolve_path(&self, path: &[String]) -> DispatchResult<&Command> {
        let unknown = || DispatchError::UnknownCommand(path.join(" "));

        let (first, rest) = path.split_first().ok_or_else(unknown)?;
        let command = self.get(first).ok_or_else(unknown)?;
        if rest.is_empty() {
            return Ok(command);
        }

        command
            .sub_commands()
            .ok_or_else(unknown)?
            .resolve_path(rest)
            .map_err(|_| unknown())
    }

    fn help_text(&self, path: &[String]) -> DispatchResult<String> {
        if path.is_empty() {
            return Ok(self.help_lines().join("\n"));
        }

        let command = self.resolve_path(path)?;
        let mut lines = command.help_lines().to_vec();
        if let Some(nested) = command.sub_commands() {
            lines.extend(nested.help_lines());
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::argument::ArgumentDescriptor;
    use crate::command::convert::TypeInfo;
    use crate::command::error::TokenizeError;
    use crate::command::registry::CommandDef;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn echo(name: &str) -> CommandDef {
        CommandDef::new(name)
            .with_argument(ArgumentDescriptor::text("words").params().optional())
            .with_handler(|args| Ok(Some(args.list::<String>(0).join("|"))))
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("say hello  world"), ("say", "hello  world"));
        assert_eq!(split_command("say"), ("say", ""));
        assert_eq!(split_command("say\t x"), ("say", "x"));
    }

    #[test]
    fn test_empty_line_is_noop() {
        let manager = CommandManager::new();
        assert!(manager.execute("").unwrap().is_none());
        assert!(manager.execute("   \t").unwrap().is_none());
    }

    #[test]
    fn test_unknown_command() {
        let manager = CommandManager::new();
        match manager.execute("nope a b") {
            Err(DispatchError::UnknownCommand(name)) => assert_eq!(name, "nope"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_tokenizes_rest() {
        let mut manager = CommandManager::new();
        manager.register(echo("echo")).unwrap();

        let out = manager.execute("  echo 'a b'  c\\tc  ").unwrap();
        assert_eq!(out.as_deref(), Some("a b|c\tc"));
    }

    #[test]
    fn test_alias_dispatch() {
        let mut manager = CommandManager::new();
        manager.register(echo("echo").with_alias("e")).unwrap();
        assert_eq!(manager.execute("e x").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_typed_scenario() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut manager = CommandManager::new();
        manager
            .register(
                CommandDef::new("g")
                    .with_argument(ArgumentDescriptor::text("s"))
                    .with_argument(ArgumentDescriptor::new("i", TypeInfo::parsed::<i32>()))
                    .with_argument(ArgumentDescriptor::new("u", TypeInfo::parsed::<u32>()))
                    .with_handler(move |args| {
                        sink.lock().push((
                            args.require::<String>(0)?.clone(),
                            *args.require::<i32>(1)?,
                            *args.require::<u32>(2)?,
                        ));
                        Ok(None)
                    }),
            )
            .unwrap();

        manager.execute("g 'hello world' -123 123").unwrap();
        assert_eq!(*seen.lock(), vec![("hello world".to_string(), -123, 123)]);
    }

    #[test]
    fn test_tokenize_error_surfaces() {
        let mut manager = CommandManager::new();
        manager.register(echo("echo")).unwrap();

        match manager.execute("echo 'open") {
            Err(DispatchError::Tokenize(TokenizeError::UnterminatedQuote(offset))) => {
                assert_eq!(offset, 5)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_tokenize_offsets_follow_verbs() {
        let mut manager = CommandManager::new();
        manager
            .add_verb(CommandDef::new("db"))
            .unwrap()
            .register(echo("echo"))
            .unwrap();

        let line = "  db echo ok \\q";
        match manager.execute(line) {
            Err(DispatchError::Tokenize(err)) => assert_eq!(err.offset(), line.find("\\q").unwrap()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_raw_command_gets_rest_verbatim() {
        let mut manager = CommandManager::new();
        manager
            .register(
                CommandDef::new("sh")
                    .raw()
                    .with_argument(ArgumentDescriptor::text("line"))
                    .with_handler(|args| Ok(args.text(0).map(str::to_string))),
            )
            .unwrap();

        assert_eq!(
            manager.execute("sh  ls -la 'unclosed \\q").unwrap().as_deref(),
            Some("ls -la 'unclosed \\q")
        );
        assert_eq!(manager.execute("sh").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_verb_depth_matches_routing_depth() {
        let hits = Arc::new(Mutex::new(Vec::new()));

        let mut manager = CommandManager::new();
        let mut current = &mut manager;
        for depth in 0..3 {
            let log = hits.clone();
            let nested = current
                .add_verb(CommandDef::new(&format!("v{}", depth)))
                .unwrap();
            let marker = depth;
            nested
                .register(
                    CommandDef::new("c")
                        .with_argument(ArgumentDescriptor::text("rest").params().optional())
                        .with_handler(move |args| {
                            log.lock().push((marker, args.list::<String>(0).to_vec()));
                            Ok(None)
                        }),
                )
                .unwrap();
            current = nested;
        }

        manager.execute("v0 v1 v2 c x y").unwrap();
        assert_eq!(
            *hits.lock(),
            vec![(2, vec!["x".to_string(), "y".to_string()])]
        );

        manager.execute("v0 c z").unwrap();
        assert_eq!(hits.lock().last().unwrap().0, 0);
    }

    #[test]
    fn test_unknown_at_nested_depth() {
        let mut manager = CommandManager::new();
        manager
            .add_verb(CommandDef::new("v0"))
            .unwrap()
            .add_verb(CommandDef::new("v1"))
            .unwrap();

        match manager.execute("v0 v1 missing") {
            Err(DispatchError::UnknownCommand(name)) => assert_eq!(name, "missing"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(manager.execute("v0").unwrap().is_none());
    }

    #[test]
    fn test_help_command_renders_paths() {
        let mut manager = CommandManager::new();
        manager.add_help_command().unwrap();
        manager
            .add_verb(CommandDef::new("db").with_description("Database"))
            .unwrap()
            .register(echo("dump").with_description("Dump rows"))
            .unwrap();

        let all = manager.execute("help").unwrap().unwrap();
        assert!(all.contains("db - Database"));
        assert!(all.contains("dump - Dump rows"));

        let one = manager.execute("help db dump").unwrap().unwrap();
        assert!(one.starts_with("dump - Dump rows"));

        assert!(matches!(
            manager.execute("help db nothing"),
            Err(DispatchError::UnknownCommand(path)) if path == "db nothing"
        ));
    }

    #[test]
    fn test_resolve_path_through_non_verb_fails() {
        let mut manager = CommandManager::new();
        manager.register(echo("echo")).unwrap();
        let path = vec!["echo".to_string(), "deeper".to_string()];
        assert!(manager.resolve_path(&path).is_err());
    }
}

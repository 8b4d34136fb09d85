// Tue Jan 20 2026 - Alex

use crate::command::registry::{Command, CommandManager};
use itertools::Itertools;

const INDENT: &str = "  ";

impl Command {
    /// Usage text for this command, rendered on first use and cached.
    ///
    /// ```text
    /// name - description
    ///   usage: name arg [opt] rest...
    ///   aliases: name, n
    ///   arg   what it is
    ///   mode  how to run
    ///         values: fast, slow
    ///   example: name x
    /// ```
    pub fn help_lines(&self) -> &[String] {
        self.help.get_or_init(|| self.render_help())
    }

    fn render_help(&self) -> Vec<String> {
        let primary = self.primary_name();
        let mut lines = Vec::new();

        lines.push(format!("{} - {}", primary, self.description()));

        let usage = std::iter::once(primary.to_string())
            .chain(self.arguments().iter().map(|arg| arg.usage()))
            .join(" ");
        lines.push(format!("{}usage: {}", INDENT, usage));

        if self.names().len() > 1 {
            lines.push(format!("{}aliases: {}", INDENT, self.names().iter().join(", ")));
        }

        let width = self
            .arguments()
            .iter()
            .map(|arg| arg.name.chars().count())
            .max()
            .unwrap_or(0);

        for arg in self.arguments() {
            let line = format!("{}{:<width$}  {}", INDENT, arg.name, arg.description, width = width);
            lines.push(line.trim_end().to_string());

            if let Some(names) = arg.type_info.enum_names() {
                lines.push(format!(
                    "{}{:<width$}  values: {}",
                    INDENT,
                    "",
                    names.iter().join(", "),
                    width = width
                ));
            }
        }

        for example in self.examples() {
            lines.push(format!("{}example: {}", INDENT, example));
        }

        lines
    }
}

impl CommandManager {
    /// Help for every command in registration order, one indent deeper than
    /// the commands themselves. Verbs list their own commands below them.
    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for command in self.commands() {
            lines.extend(command.help_lines().iter().map(|line| format!("{}{}", INDENT, line)));

            if let Some(nested) = command.sub_commands() {
                lines.extend(
                    nested
                        .help_lines()
                        .into_iter()
                        .map(|line| format!("{}{}", INDENT, line)),
                );
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use crate::command::argument::ArgumentDescriptor;
    use crate::command::convert::TypeInfo;
    use crate::command::registry::{CommandDef, CommandManager, Overwrite};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Speed {
        Fast,
        Slow,
    }

    crate::command_enum!(Speed { Fast => "fast", Slow => "slow" });

    fn copy_def() -> CommandDef {
        CommandDef::new("copy")
            .with_alias("cp")
            .with_description("Copy files")
            .with_argument(ArgumentDescriptor::text("from").with_description("source"))
            .with_argument(
                ArgumentDescriptor::new("speed", TypeInfo::enumeration::<Speed>())
                    .with_description("copy speed")
                    .with_default("fast"),
            )
            .with_argument(ArgumentDescriptor::text("to").params().optional())
            .with_example("copy a fast b c")
    }

    #[test]
    fn test_command_help_layout() {
        let mut manager = CommandManager::new();
        manager.register(copy_def()).unwrap();

        let lines = manager.get("copy").unwrap().help_lines().to_vec();
        assert_eq!(
            lines,
            vec![
                "copy - Copy files",
                "  usage: copy from [speed] [to...]",
                "  aliases: copy, cp",
                "  from   source",
                "  speed  copy speed",
                "         values: fast, slow",
                "  to",
                "  example: copy a fast b c",
            ]
        );
    }

    #[test]
    fn test_bare_command_help() {
        let mut manager = CommandManager::new();
        manager.register(CommandDef::new("quit")).unwrap();
        assert_eq!(manager.get("quit").unwrap().help_lines(), ["quit - ", "  usage: quit"]);
    }

    #[test]
    fn test_help_is_memoized() {
        let mut manager = CommandManager::new();
        manager.register(copy_def()).unwrap();

        let command = manager.get("cp").unwrap();
        let first = command.help_lines().as_ptr();
        let second = command.help_lines().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_help_refreshes_after_alias_taken_over() {
        let mut manager = CommandManager::new();
        manager.register(copy_def()).unwrap();
        assert!(manager.get("copy").unwrap().help_lines().iter().any(|l| l.contains("aliases")));

        manager
            .register_with(CommandDef::new("cp"), Overwrite::Allow)
            .unwrap();
        assert!(!manager.get("copy").unwrap().help_lines().iter().any(|l| l.contains("aliases")));
    }

    #[test]
    fn test_manager_help_nests_verbs() {
        let mut manager = CommandManager::new();
        manager.register(CommandDef::new("quit").with_description("Leave")).unwrap();
        manager
            .add_verb(CommandDef::new("db").with_description("Database"))
            .unwrap()
            .register(CommandDef::new("dump").with_description("Dump rows"))
            .unwrap();

        let lines = manager.help_lines();
        assert_eq!(lines[0], "  quit - Leave");
        assert!(lines.contains(&"  db - Database".to_string()));
        assert!(lines.contains(&"    dump - Dump rows".to_string()));
        assert!(lines.contains(&"      usage: dump".to_string()));
    }
}

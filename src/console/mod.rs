// Wed Jan 21 2026 - Alex

pub mod banner;
pub mod display;
pub mod io;

pub use banner::{Banner, BannerStyle};
pub use display::ErrorDisplay;
pub use io::{LineSink, LineSource, MemorySink, ScriptSource, StdinSource, StdoutSink};

use crate::command::CommandManager;
use crate::config::ConsoleConfig;
use log::{debug, warn};
use std::io as stdio;

/// Counters for one `Console::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub exited: bool,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Read a line, dispatch it, print what came back. Dispatch errors are
/// reported on the sink and the loop keeps going unless configured to stop.
pub struct Console<'a> {
    manager: &'a CommandManager,
    config: ConsoleConfig,
    display: ErrorDisplay,
    banner: Option<Banner>,
}

impl<'a> Console<'a> {
    pub fn new(manager: &'a CommandManager, config: ConsoleConfig) -> Self {
        let display = ErrorDisplay::for_terminal(config.color);
        Self {
            manager,
            config,
            display,
            banner: None,
        }
    }

    pub fn with_display(mut self, display: ErrorDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banner = Some(banner);
        self
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> stdio::Result<RunSummary>
    where
        S: LineSource + ?Sized,
        K: LineSink + ?Sized,
    {
        if self.config.show_banner {
            if let Some(banner) = &self.banner {
                for line in banner.lines() {
                    sink.emit_line(&line)?;
                }
            }
        }

        let mut summary = RunSummary::default();

        while let Some(line) = source.next_line()? {
            summary.lines += 1;

            if self.config.is_exit_word(&line) {
                debug!("exit word '{}' read, leaving", line.trim());
                summary.exited = true;
                break;
            }

            if self.run_line(&line, sink)? {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
                if self.config.stop_on_error {
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Dispatch a single line. `Ok(false)` means the command failed and the
    /// failure was reported on `sink`; `Err` is only for sink I/O.
    pub fn run_line<K>(&self, line: &str, sink: &mut K) -> stdio::Result<bool>
    where
        K: LineSink + ?Sized,
    {
        match self.manager.execute(line) {
            Ok(Some(output)) => {
                if self.config.echo_results {
                    for out in output.lines() {
                        sink.emit_line(out)?;
                    }
                }
                Ok(true)
            }
            Ok(None) => Ok(true),
            Err(err) => {
                warn!("command failed: {}", err);
                for out in self.display.format_dispatch(&err, line) {
                    sink.emit_line(&out)?;
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgumentDescriptor, CommandDef, TypeInfo};

    fn manager() -> CommandManager {
        let mut manager = CommandManager::new();
        manager.add_help_command().unwrap();
        manager
            .register(
                CommandDef::new("add")
                    .with_argument(ArgumentDescriptor::new("a", TypeInfo::parsed::<i64>()))
                    .with_argument(ArgumentDescriptor::new("b", TypeInfo::parsed::<i64>()))
                    .with_handler(|args| {
                        let sum = args.require::<i64>(0)? + args.require::<i64>(1)?;
                        Ok(Some(sum.to_string()))
                    }),
            )
            .unwrap();
        manager
            .register(CommandDef::new("fail").with_handler(|_| anyhow::bail!("boom")))
            .unwrap();
        manager
    }

    fn console(manager: &CommandManager, config: ConsoleConfig) -> Console<'_> {
        Console::new(manager, config).with_display(ErrorDisplay::new().without_colors())
    }

    #[test]
    fn test_runs_until_exit_word() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default());
        let mut source = ScriptSource::new(["add 1 2", "", "quit", "add 3 4"]);
        let mut sink = MemorySink::new();

        let summary = console.run(&mut source, &mut sink).unwrap();

        assert_eq!(sink.lines(), vec!["3"]);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.succeeded, 2);
        assert!(summary.exited);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_errors_are_reported_and_loop_continues() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default());
        let mut source = ScriptSource::new(["nope", "add 1 'x", "fail", "add 2 2"]);
        let mut sink = MemorySink::new();

        let summary = console.run(&mut source, &mut sink).unwrap();

        assert_eq!(summary.failed, 3);
        assert!(!summary.is_clean());
        assert!(!summary.exited);

        let lines = sink.lines();
        assert_eq!(lines[0], "Error: Unknown command: nope");
        assert_eq!(lines[2], "  add 1 'x");
        assert_eq!(lines[3], "        ^");
        assert_eq!(lines[4], "Error: boom");
        assert_eq!(lines.last().map(String::as_str), Some("4"));
    }

    #[test]
    fn test_stop_on_error() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default().with_stop_on_error(true));
        let mut source = ScriptSource::new(["fail", "add 1 1"]);
        let mut sink = MemorySink::new();

        let summary = console.run(&mut source, &mut sink).unwrap();
        assert_eq!(summary.lines, 1);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_echo_can_be_disabled() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default().with_echo_results(false));
        let mut sink = MemorySink::new();

        assert!(console.run_line("add 1 1", &mut sink).unwrap());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_banner_shown_once() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default())
            .with_banner(Banner::new("calc").with_color(false));
        let mut sink = MemorySink::new();

        console.run(&mut ScriptSource::new(["add 1 1"]), &mut sink).unwrap();
        assert_eq!(sink.lines(), vec!["=== calc ===", "2"]);
    }

    #[test]
    fn test_help_output_is_split_into_lines() {
        let manager = manager();
        let console = console(&manager, ConsoleConfig::default());
        let mut sink = MemorySink::new();

        console.run_line("help add", &mut sink).unwrap();
        assert_eq!(sink.lines()[0], "add - ");
        assert_eq!(sink.lines()[1], "  usage: add a b");
    }
}

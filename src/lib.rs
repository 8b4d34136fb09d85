// Tue Jan 15 2026 - Alex

pub mod command;
pub mod config;
pub mod console;
pub mod utils;

pub use command::{
    ArgumentDescriptor, Arguments, Command, CommandDef, CommandEnum, CommandManager, DefinitionError,
    DispatchError, Modifiers, Overwrite, TokenizeError, TypeInfo,
};
pub use config::ConsoleConfig;
pub use console::Console;

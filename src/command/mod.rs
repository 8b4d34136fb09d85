// Fri Jan 16 2026 - Alex

pub mod argument;
pub mod binder;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod registry;
pub mod tokenizer;

pub use argument::{ArgumentDescriptor, Modifiers, Passing};
pub use binder::{compile, Arguments, CompiledInvoker, Handler, Output};
pub use convert::{CommandEnum, Strategy, TypeInfo, TypeInfoBuilder, Value};
pub use dispatch::split_command;
pub use error::{DefinitionError, DefinitionResult, DispatchError, DispatchResult, TokenizeError};
pub use registry::{is_valid_name, Command, CommandDef, CommandManager, Overwrite, HELP_COMMAND};
pub use tokenizer::{tokenize, unescape, CharDecoder};

// Sun Jan 18 2026 - Alex

use crate::command::argument::{ArgumentDescriptor, Passing};
use crate::command::convert::{Strategy, TypeInfo, Value};
use crate::command::error::{DefinitionError, DefinitionResult, DispatchError, DispatchResult};
use std::fmt;

/// What a handler hands back to the console: text to print, if any.
pub type Output = Option<String>;

pub type Handler = Box<dyn Fn(&Arguments<'_>) -> anyhow::Result<Output> + Send + Sync>;

type Invoke = Box<dyn Fn(&str, &[String]) -> DispatchResult<Output> + Send + Sync>;

/// Converted arguments for one handler call, in parameter order.
pub struct Arguments<'a> {
    command: &'a str,
    names: &'a [String],
    values: Vec<Option<Value>>,
}

impl<'a> Arguments<'a> {
    /// The name (or alias) the command was invoked with.
    pub fn command(&self) -> &str {
        self.command
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some(Some(_)))
    }

    /// The value at `index`, if present and of type `T`.
    ///
    /// `PARAMS` parameters hold a `Vec<T>` of the element type.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.as_ref()?.downcast_ref::<T>()
    }

    pub fn get_by_name<T: 'static>(&self, name: &str) -> Option<&T> {
        let index = self.names.iter().position(|n| n == name)?;
        self.get(index)
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.get::<String>(index).map(String::as_str)
    }

    /// Elements of a `PARAMS` parameter; empty when absent.
    pub fn list<T: 'static>(&self, index: usize) -> &[T] {
        self.get::<Vec<T>>(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Like [`get`](Self::get), but absence is an error the handler can `?`.
    pub fn require<T: 'static>(&self, index: usize) -> anyhow::Result<&T> {
        let name = self.names.get(index).map(String::as_str).unwrap_or("?");
        self.get(index).ok_or_else(|| {
            anyhow::anyhow!(
                "{}: argument '{}' is missing or not a {}",
                self.command,
                name,
                std::any::type_name::<T>()
            )
        })
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("command", &self.command)
            .field("names", &self.names)
            .field(
                "present",
                &self.values.iter().map(Option::is_some).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A handler bound to its parameter list. Built once, called per dispatch.
pub struct CompiledInvoker {
    arity: usize,
    call: Invoke,
}

impl CompiledInvoker {
    pub fn invoke(&self, command: &str, tokens: &[String]) -> DispatchResult<Output> {
        (self.call)(command, tokens)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for CompiledInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledInvoker")
            .field("arity", &self.arity)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Single,
    JoinRest,
    Params,
}

struct Binding {
    name: String,
    type_info: TypeInfo,
    strategy: Strategy,
    shape: Shape,
    optional: bool,
    default: Option<String>,
}

impl Binding {
    fn convert(&self, command: &str, token: &str) -> DispatchResult<Value> {
        self.strategy
            .convert(token)
            .map_err(|reason| DispatchError::ArgumentConversion {
                command: command.to_string(),
                parameter: self.name.clone(),
                token: token.to_string(),
                type_name: self.type_info.name().to_string(),
                reason,
            })
    }

    // No token left for this parameter.
    fn fallback(&self, command: &str, index: usize) -> DispatchResult<Option<Value>> {
        if !self.optional {
            return Err(DispatchError::MissingArgument {
                command: command.to_string(),
                index,
                parameter: self.name.clone(),
            });
        }

        match &self.default {
            Some(default) => self.convert(command, default).map(Some),
            None => Ok(None),
        }
    }

    fn bind(&self, command: &str, index: usize, tokens: &[String]) -> DispatchResult<Option<Value>> {
        match self.shape {
            Shape::Single => match tokens.first() {
                Some(token) => self.convert(command, token).map(Some),
                None => self.fallback(command, index),
            },
            Shape::JoinRest if tokens.is_empty() => self.fallback(command, index),
            Shape::JoinRest => Ok(Some(Box::new(tokens.join(" ")))),
            Shape::Params => {
                let items = tokens
                    .iter()
                    .map(|token| self.convert(command, token))
                    .collect::<DispatchResult<Vec<_>>>()?;
                Ok(Some(self.type_info.collect(items)))
            }
        }
    }
}

fn invalid(arg: &ArgumentDescriptor, reason: &str) -> DefinitionError {
    DefinitionError::InvalidModifierCombination {
        parameter: arg.name.clone(),
        reason: reason.to_string(),
    }
}

fn check_raw(command: &str, arguments: &[ArgumentDescriptor]) -> DefinitionResult<()> {
    match arguments {
        [only] if only.type_info.is_text() && only.modifiers.is_trailing() => Err(invalid(
            only,
            "the parameter of a raw command already receives the whole rest of the line",
        )),
        [only] if only.type_info.is_text() => Ok(()),
        _ => Err(DefinitionError::RawInputArityMismatch {
            command: command.to_string(),
        }),
    }
}

fn plan_argument(
    arg: &ArgumentDescriptor,
    is_last: bool,
    after_optional: bool,
) -> DefinitionResult<Binding> {
    if arg.passing == Passing::MutableRef {
        return Err(DefinitionError::ByReferenceParameter {
            parameter: arg.name.clone(),
        });
    }

    let shape = match (arg.is_join_rest(), arg.is_params()) {
        (true, true) => return Err(invalid(arg, "JoinRest and Params cannot be combined")),
        (true, false) => Shape::JoinRest,
        (false, true) => Shape::Params,
        (false, false) => Shape::Single,
    };

    if shape != Shape::Single && !is_last {
        return Err(invalid(arg, "only the last parameter may take the rest of the line"));
    }
    if shape == Shape::JoinRest && !arg.type_info.is_text() {
        return Err(invalid(arg, "JoinRest requires a text parameter"));
    }
    if after_optional && !arg.is_optional() && shape != Shape::Params {
        return Err(invalid(arg, "a required parameter cannot follow an optional one"));
    }

    let strategy = arg
        .type_info
        .strategy()
        .ok_or_else(|| DefinitionError::NonConvertibleParameter {
            parameter: arg.name.clone(),
            type_name: arg.type_info.name().to_string(),
        })?;

    if let Some(default) = &arg.default {
        if shape == Shape::Params {
            return Err(invalid(arg, "Params parameters cannot have a default"));
        }
        strategy
            .convert(default)
            .map_err(|reason| DefinitionError::InvalidDefault {
                parameter: arg.name.clone(),
                value: default.clone(),
                reason,
            })?;
    }

    Ok(Binding {
        name: arg.name.clone(),
        type_info: arg.type_info.clone(),
        strategy,
        shape,
        optional: arg.is_optional(),
        default: arg.default.clone(),
    })
}

/// Validate `arguments` and bind `handler` to them.
///
/// All definition checks happen here so that a bad definition never reaches
/// dispatch. For raw commands the single text parameter receives the rest of
/// the line as one token.
pub fn compile(
    command: &str,
    arguments: &[ArgumentDescriptor],
    raw: bool,
    handler: Handler,
) -> DefinitionResult<CompiledInvoker> {
    if raw {
        check_raw(command, arguments)?;
    }

    let mut plan = Vec::with_capacity(arguments.len());
    let mut seen_optional = false;
    for (index, arg) in arguments.iter().enumerate() {
        plan.push(plan_argument(arg, index + 1 == arguments.len(), seen_optional)?);
        seen_optional |= arg.is_optional();
    }

    let names: Vec<String> = plan.iter().map(|binding| binding.name.clone()).collect();
    let arity = plan.len();

    let call: Invoke = Box::new(move |command: &str, tokens: &[String]| {
        let mut values = Vec::with_capacity(plan.len());
        let mut cursor = 0;

        for (index, binding) in plan.iter().enumerate() {
            let available = &tokens[cursor.min(tokens.len())..];
            let consumed = match binding.shape {
                Shape::Single => available.len().min(1),
                Shape::JoinRest | Shape::Params => available.len(),
            };
            values.push(binding.bind(command, index, &available[..consumed])?);
            cursor += consumed;
        }

        if cursor < tokens.len() {
            return Err(DispatchError::TooManyArguments {
                command: command.to_string(),
                expected: plan.len(),
                got: tokens.len(),
            });
        }

        let args = Arguments {
            command,
            names: &names,
            values,
        };
        handler(&args).map_err(DispatchError::Handler)
    });

    Ok(CompiledInvoker { arity, call })
}

// Sat Jan 17 2026 - Alex

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A converted argument value. Handlers get it back through `Arguments::get`.
pub type Value = Box<dyn Any>;

pub type ConvertFn = fn(&str) -> Result<Value, String>;
type CollectFn = fn(Vec<Value>) -> Value;
type NamesFn = fn() -> Vec<&'static str>;

/// Enumerations selectable on the command line by (case-insensitive) name.
pub trait CommandEnum: Clone + Sized + 'static {
    fn variants() -> &'static [Self];

    fn name(&self) -> &'static str;

    fn lookup(text: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(text))
            .cloned()
    }

    fn names() -> Vec<&'static str> {
        Self::variants().iter().map(|variant| variant.name()).collect()
    }
}

/// Implements [`CommandEnum`] for a fieldless enum.
///
/// ```
/// use verbline::command_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode { Fast, Slow }
///
/// command_enum!(Mode { Fast => "fast", Slow => "slow" });
/// ```
#[macro_export]
macro_rules! command_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $crate::command::CommandEnum for $ty {
            fn variants() -> &'static [Self] {
                &[$($ty::$variant),+]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }
    };
}

/// How a token becomes a value of some declared type.
#[derive(Clone, Copy)]
pub enum Strategy {
    Text,
    Enumeration { convert: ConvertFn, names: NamesFn },
    Constructor(ConvertFn),
    Parse(ConvertFn),
}

impl Strategy {
    pub fn convert(&self, token: &str) -> Result<Value, String> {
        match self {
            Strategy::Text => Ok(Box::new(token.to_string())),
            Strategy::Enumeration { convert, .. } => convert(token),
            Strategy::Constructor(convert) | Strategy::Parse(convert) => convert(token),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Strategy::Text => "text",
            Strategy::Enumeration { .. } => "enumeration",
            Strategy::Constructor(_) => "constructor",
            Strategy::Parse(_) => "parse",
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// What is known about a parameter's declared type: its name and which text
/// conversions it offers.
#[derive(Clone)]
pub struct TypeInfo {
    name: &'static str,
    id: TypeId,
    enumeration: Option<(ConvertFn, NamesFn)>,
    constructor: Option<ConvertFn>,
    parser: Option<ConvertFn>,
    collect: CollectFn,
}

impl TypeInfo {
    /// Start describing `T`. Without further capabilities the type is not convertible.
    pub fn of<T: 'static>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder {
            info: TypeInfo {
                name: short_type_name::<T>(),
                id: TypeId::of::<T>(),
                enumeration: None,
                constructor: None,
                parser: None,
                collect: collect_vec::<T>,
            },
            _marker: PhantomData,
        }
    }

    pub fn text() -> Self {
        Self::of::<String>().build()
    }

    pub fn enumeration<E: CommandEnum>() -> Self {
        Self::of::<E>().enumerable().build()
    }

    pub fn constructed<T: From<String> + 'static>() -> Self {
        Self::of::<T>().constructible().build()
    }

    pub fn parsed<T>() -> Self
    where
        T: FromStr + 'static,
        T::Err: fmt::Display,
    {
        Self::of::<T>().parsable().build()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_text(&self) -> bool {
        self.id == TypeId::of::<String>()
    }

    pub fn enum_names(&self) -> Option<Vec<&'static str>> {
        self.enumeration.map(|(_, names)| names())
    }

    /// The conversion to use, by priority: text, enumeration, constructor, parse.
    pub fn strategy(&self) -> Option<Strategy> {
        if self.is_text() {
            return Some(Strategy::Text);
        }
        if let Some((convert, names)) = self.enumeration {
            return Some(Strategy::Enumeration { convert, names });
        }
        if let Some(convert) = self.constructor {
            return Some(Strategy::Constructor(convert));
        }
        self.parser.map(Strategy::Parse)
    }

    /// Pack individually converted values into a `Vec<T>`.
    pub fn collect(&self, items: Vec<Value>) -> Value {
        (self.collect)(items)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("strategy", &self.strategy())
            .finish()
    }
}

/// Declares the conversions a type `T` supports.
pub struct TypeInfoBuilder<T> {
    info: TypeInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeInfoBuilder<T> {
    pub fn enumerable(mut self) -> Self
    where
        T: CommandEnum,
    {
        self.info.enumeration = Some((convert_enum::<T>, T::names));
        self
    }

    pub fn constructible(mut self) -> Self
    where
        T: From<String>,
    {
        self.info.constructor = Some(convert_from_string::<T>);
        self
    }

    pub fn parsable(mut self) -> Self
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.info.parser = Some(convert_from_str::<T>);
        self
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.info.name = name;
        self
    }

    pub fn build(self) -> TypeInfo {
        self.info
    }
}

fn convert_enum<E: CommandEnum>(token: &str) -> Result<Value, String> {
    E::lookup(token)
        .map(|variant| Box::new(variant) as Value)
        .ok_or_else(|| format!("expected one of: {}", E::names().join(", ")))
}

fn convert_from_string<T: From<String> + 'static>(token: &str) -> Result<Value, String> {
    Ok(Box::new(T::from(token.to_string())))
}

fn convert_from_str<T>(token: &str) -> Result<Value, String>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    token
        .parse::<T>()
        .map(|value| Box::new(value) as Value)
        .map_err(|e| e.to_string())
}

fn collect_vec<T: 'static>(items: Vec<Value>) -> Value {
    let values: Vec<T> = items
        .into_iter()
        .filter_map(|item| item.downcast::<T>().ok())
        .map(|item| *item)
        .collect();
    Box::new(values)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shade {
        Light,
        Dark,
    }

    crate::command_enum!(Shade { Light => "light", Dark => "dark" });

    #[derive(Debug, PartialEq)]
    struct Label(String);

    impl From<String> for Label {
        fn from(s: String) -> Self {
            Label(format!("ctor:{}", s))
        }
    }

    impl FromStr for Label {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(Label(format!("parse:{}", s)))
        }
    }

    struct Opaque;

    #[test]
    fn test_text_passes_through() {
        let info = TypeInfo::text();
        let value = info.strategy().unwrap().convert("a b").unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "a b");
    }

    #[test]
    fn test_enum_lookup_is_case_insensitive() {
        let info = TypeInfo::enumeration::<Shade>();
        let value = info.strategy().unwrap().convert("DaRk").unwrap();
        assert_eq!(*value.downcast_ref::<Shade>().unwrap(), Shade::Dark);
        assert_eq!(info.enum_names(), Some(vec!["light", "dark"]));

        let err = info.strategy().unwrap().convert("grey").unwrap_err();
        assert!(err.contains("light, dark"));
    }

    #[test]
    fn test_constructor_wins_over_parse() {
        let info = TypeInfo::of::<Label>().parsable().constructible().build();
        assert_eq!(info.strategy().unwrap().kind_name(), "constructor");
        let value = info.strategy().unwrap().convert("x").unwrap();
        assert_eq!(*value.downcast_ref::<Label>().unwrap(), Label("ctor:x".into()));
    }

    #[test]
    fn test_parse_strategy_reports_error() {
        let info = TypeInfo::parsed::<u32>();
        assert!(info.strategy().unwrap().convert("-1").is_err());
        let value = info.strategy().unwrap().convert("17").unwrap();
        assert_eq!(*value.downcast_ref::<u32>().unwrap(), 17);
    }

    #[test]
    fn test_opaque_type_has_no_strategy() {
        let info = TypeInfo::of::<Opaque>().build();
        assert!(info.strategy().is_none());
        assert_eq!(info.name(), "Opaque");
    }

    #[test]
    fn test_collect_builds_typed_vec() {
        let info = TypeInfo::parsed::<i64>();
        let strategy = info.strategy().unwrap();
        let items = vec![strategy.convert("1").unwrap(), strategy.convert("-2").unwrap()];
        let packed = info.collect(items);
        assert_eq!(packed.downcast_ref::<Vec<i64>>().unwrap(), &vec![1, -2]);
    }
}

// Sat Jan 17 2026 - Alex

use crate::command::convert::TypeInfo;
use bitflags::bitflags;

bitflags! {
    /// How a parameter consumes tokens. The empty set means required.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const OPTIONAL = 0b0001;
        const JOIN_REST = 0b0010;
        const PARAMS = 0b0100;
    }
}

impl Modifiers {
    pub const REQUIRED: Self = Self::empty();

    pub fn is_trailing(&self) -> bool {
        self.intersects(Self::JOIN_REST | Self::PARAMS)
    }
}

/// How the handler would receive the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passing {
    #[default]
    Value,
    /// Output-style parameter. Declarable, but rejected when compiled.
    MutableRef,
}

/// One parameter of a command handler.
#[derive(Debug, Clone)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub description: String,
    pub type_info: TypeInfo,
    pub modifiers: Modifiers,
    pub default: Option<String>,
    pub passing: Passing,
}

impl ArgumentDescriptor {
    pub fn new(name: &str, type_info: TypeInfo) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            type_info,
            modifiers: Modifiers::REQUIRED,
            default: None,
            passing: Passing::Value,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, TypeInfo::text())
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn optional(mut self) -> Self {
        self.modifiers |= Modifiers::OPTIONAL;
        self
    }

    /// Make the parameter optional with a default, given as text and converted like a token.
    pub fn with_default(mut self, default: &str) -> Self {
        self.modifiers |= Modifiers::OPTIONAL;
        self.default = Some(default.to_string());
        self
    }

    pub fn join_rest(mut self) -> Self {
        self.modifiers |= Modifiers::JOIN_REST;
        self
    }

    pub fn params(mut self) -> Self {
        self.modifiers |= Modifiers::PARAMS;
        self
    }

    pub fn by_mutable_ref(mut self) -> Self {
        self.passing = Passing::MutableRef;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.modifiers.contains(Modifiers::OPTIONAL)
    }

    pub fn is_join_rest(&self) -> bool {
        self.modifiers.contains(Modifiers::JOIN_REST)
    }

    pub fn is_params(&self) -> bool {
        self.modifiers.contains(Modifiers::PARAMS)
    }

    /// `name`, `name...`, `[name]` or `[name...]`.
    pub fn usage(&self) -> String {
        let body = if self.modifiers.is_trailing() {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        };

        if self.is_optional() {
            format!("[{}]", body)
        } else {
            body
        }
    }
}

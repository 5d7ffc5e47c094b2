// src/models.rs

use std::fmt;
use std::sync::Arc;

use crate::constants::DEFAULT_SCOPE_NAME;

// --- SCOPE ---

/// A named configuration namespace (e.g. `default`, `test`). Scopes select
/// which property definitions apply during alias resolution.
///
/// The default scope is the sentinel with an empty internal name; the literal
/// text `default` normalizes to it. Names are normalized to lowercase, and
/// two scopes are equal iff their normalized names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    name: String,
}

impl Scope {
    /// Constructs a scope from user/CLI input or a parsed qualifier prefix.
    pub fn named(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        if normalized == DEFAULT_SCOPE_NAME {
            return Self::default();
        }
        Self { name: normalized }
    }

    /// The normalized scope name; empty for the default scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            name: String::new(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "{}", DEFAULT_SCOPE_NAME)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

// --- SCRIPT ---

/// The leaf invocation unit: a command name, its owning scope, the literal
/// text it was parsed from, and its ordered arguments. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    /// The original literal text, preserved for diagnostics. For a quoted
    /// multi-word command this is the quoted content without quotes; for a
    /// scope-qualified token it keeps the `scope:` prefix.
    pub unparsed_name: String,
    pub scope: Scope,
    /// Ordered arguments, never including the command name itself.
    pub arguments: Vec<String>,
}

impl Script {
    /// Parses a single unquoted token under `ambient` scope. A `scope:rest`
    /// prefix (split at the first colon) overrides the scope for this token
    /// only; `unparsed_name` keeps the full token text while `name` is
    /// derived from `rest` alone.
    pub fn parse(token: &str, ambient: &Scope) -> Self {
        if let Some((scope_part, rest)) = token.split_once(':')
            && !rest.is_empty()
        {
            return Self {
                name: rest.to_string(),
                unparsed_name: token.to_string(),
                scope: Scope::named(scope_part),
                arguments: Vec::new(),
            };
        }
        Self {
            name: token.to_string(),
            unparsed_name: token.to_string(),
            scope: ambient.clone(),
            arguments: Vec::new(),
        }
    }

    /// Builds a literal multi-word command from quoted content: the first
    /// whitespace sub-word is the name, the rest are arguments.
    pub fn from_literal(content: &str, scope: &Scope) -> Self {
        let mut words = content.split_whitespace();
        let name = words.next().unwrap_or_default().to_string();
        Self {
            name,
            unparsed_name: content.to_string(),
            scope: scope.clone(),
            arguments: words.map(str::to_string).collect(),
        }
    }

    /// The scope-qualified identity of this script, used as the vertex value
    /// in the cycle-detection graph (`name` for the default scope,
    /// `scope:name` otherwise).
    pub fn qualified_name(&self) -> String {
        if self.scope.is_default() {
            self.name.clone()
        } else {
            format!("{}:{}", self.scope, self.name)
        }
    }
}

// --- ALIAS ---

/// A composite invocation unit: a script that owns an ordered sequence of
/// children plus the ad-hoc property overrides accumulated while it was
/// resolved. Flattening the children yields the ordered execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub unparsed_name: String,
    pub scope: Scope,
    /// Ordered children, in token order. Nested aliases are shared (`Arc`)
    /// because diamond references resolve a given (scope, name) pair once
    /// and attach the same instance under every parent.
    pub scripts: Vec<Invocation>,
    /// Literal `key=value` / `scope#key=value` override strings, insertion
    /// order preserved, duplicates allowed.
    pub ad_hoc_props: Vec<String>,
}

impl Alias {
    /// In-order leaf traversal: the flattened execution plan for this alias.
    pub fn flatten(&self) -> Vec<&Script> {
        let mut plan = Vec::new();
        self.flatten_into(&mut plan);
        plan
    }

    fn flatten_into<'a>(&'a self, plan: &mut Vec<&'a Script>) {
        for child in &self.scripts {
            match child {
                Invocation::Script(script) => plan.push(script),
                Invocation::Alias(alias) => alias.flatten_into(plan),
            }
        }
    }
}

/// A resolved invocation: either an atomic script or an expanded alias.
/// Consumers pattern-match on this instead of downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Script(Script),
    Alias(Arc<Alias>),
}

impl Invocation {
    pub fn name(&self) -> &str {
        match self {
            Self::Script(script) => &script.name,
            Self::Alias(alias) => &alias.name,
        }
    }

    pub fn unparsed_name(&self) -> &str {
        match self {
            Self::Script(script) => &script.unparsed_name,
            Self::Alias(alias) => &alias.unparsed_name,
        }
    }

    pub fn scope(&self) -> &Scope {
        match self {
            Self::Script(script) => &script.scope,
            Self::Alias(alias) => &alias.scope,
        }
    }

    /// The flattened execution plan: the script itself for a leaf, the
    /// in-order leaf traversal for an alias.
    pub fn flatten(&self) -> Vec<&Script> {
        match self {
            Self::Script(script) => vec![script],
            Self::Alias(alias) => alias.flatten(),
        }
    }
}

// MARK: --- UNIT TESTS ---

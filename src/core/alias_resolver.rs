// src/core/alias_resolver.rs

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::constants::{AD_HOC_PROP_MARKER, ALIASES_CONTEXT};
use crate::core::graph::DirectedGraph;
use crate::core::props::{self, Context, PropsError};
use crate::models::{Alias, Invocation, Scope, Script};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Circular alias reference: {cycle}")]
    CircularReference { cycle: String },
    #[error("Malformed token '{token}' at offset {offset} in alias '{alias}': {reason}")]
    Parse {
        alias: String,
        token: String,
        offset: usize,
        reason: String,
    },
    #[error(transparent)]
    Props(#[from] PropsError),
}

/// A single token of a raw alias value. `offset` is the byte offset of the
/// token within the raw value, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Plain { text: String, offset: usize },
    /// A double-quoted run, quotes stripped. Always resolves to a literal
    /// multi-word Script, never looked up as an alias.
    Quoted { content: String, offset: usize },
}

/// Splits a raw alias value into tokens: whitespace-separated words, with
/// double-quoted runs kept as single literal tokens. No escape semantics
/// beyond the quote delimiters. An unterminated quote is a parse error.
fn tokenize(alias: &str, value: &str) -> Result<Vec<Token>, ResolveError> {
    let mut tokens = Vec::new();
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        if bytes[i] == b'"' {
            let content_start = i + 1;
            let Some(close) = value[content_start..].find('"') else {
                return Err(ResolveError::Parse {
                    alias: alias.to_string(),
                    token: value[start..].to_string(),
                    offset: start,
                    reason: "unterminated quote".to_string(),
                });
            };
            tokens.push(Token::Quoted {
                content: value[content_start..content_start + close].to_string(),
                offset: start,
            });
            i = content_start + close + 1;
        } else {
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            tokens.push(Token::Plain {
                text: value[start..i].to_string(),
                offset: start,
            });
        }
    }
    Ok(tokens)
}

/// The recursive-descent engine that expands a raw alias value into a fully
/// resolved `Alias` tree.
///
/// Raw alias definitions are fetched from the property source once per scope
/// and memoized for the life of the resolver; everything else (cycle graph,
/// resolved cache, ad-hoc accumulator) is private to one top-level
/// `resolve` call and threaded through every recursive step.
#[derive(Debug)]
pub struct Resolver {
    config_dir: PathBuf,
    /// Scope -> (alias name -> raw definition), lazily populated.
    mapped_prop_cache: HashMap<Scope, Arc<HashMap<String, String>>>,
}

impl Resolver {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            mapped_prop_cache: HashMap::new(),
        }
    }

    /// The unparsed alias definitions for `scope`, read from the property
    /// source at most once per scope per resolver.
    pub fn raw_aliases_for(
        &mut self,
        scope: &Scope,
    ) -> Result<Arc<HashMap<String, String>>, ResolveError> {
        if let Some(cached) = self.mapped_prop_cache.get(scope) {
            return Ok(Arc::clone(cached));
        }
        let loaded = props::get_all(&Context::named(ALIASES_CONTEXT), scope, &self.config_dir)?;
        let shared = Arc::new(loaded);
        self.mapped_prop_cache
            .insert(scope.clone(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Resolves a single invocation token under `scope`. If the token names
    /// a defined alias it is fully expanded (with `seed_props` pre-seeding
    /// the ad-hoc accumulator); otherwise it is a literal script.
    pub fn resolve(
        &mut self,
        scope: &Scope,
        token: &str,
        seed_props: Vec<String>,
    ) -> Result<Invocation, ResolveError> {
        let invoked = Script::parse(token, scope);
        let raw_aliases = self.raw_aliases_for(&invoked.scope)?;
        let Some(value) = raw_aliases.get(&invoked.name).cloned() else {
            log::debug!(
                "'{}' is not an alias in scope '{}'; treating as a literal script.",
                invoked.name,
                invoked.scope
            );
            return Ok(Invocation::Script(invoked));
        };

        let mut graph = DirectedGraph::acyclic();
        let mut resolved_cache = HashMap::new();
        let mut ad_hoc_props = seed_props;
        let effective_scope = invoked.scope.clone();
        let alias = self.parse_alias(
            &effective_scope,
            &invoked,
            &value,
            &raw_aliases,
            &mut graph,
            &mut resolved_cache,
            &mut ad_hoc_props,
        )?;
        Ok(Invocation::Alias(Arc::new(alias)))
    }

    /// Expands `unparsed_value` (the raw definition of `invoked` under
    /// `scope`) into an `Alias`. `unparsed_aliases` is the definition mapping
    /// for `scope`; `graph`, `resolved_cache` and `ad_hoc_props` are shared
    /// across the whole top-level resolution and mutated in place, which is
    /// how sibling and recursive calls observe each other's progress.
    pub fn parse_alias(
        &mut self,
        scope: &Scope,
        invoked: &Script,
        unparsed_value: &str,
        unparsed_aliases: &HashMap<String, String>,
        graph: &mut DirectedGraph<String>,
        resolved_cache: &mut HashMap<(Scope, String), Arc<Alias>>,
        ad_hoc_props: &mut Vec<String>,
    ) -> Result<Alias, ResolveError> {
        let tokens = tokenize(&invoked.name, unparsed_value)?;
        let mut scripts = Vec::with_capacity(tokens.len());

        for token in tokens {
            match token {
                Token::Quoted { content, offset } => {
                    if content.trim().is_empty() {
                        return Err(ResolveError::Parse {
                            alias: invoked.name.clone(),
                            token: format!("\"{}\"", content),
                            offset,
                            reason: "empty quoted command".to_string(),
                        });
                    }
                    scripts.push(Invocation::Script(Script::from_literal(&content, scope)));
                }
                Token::Plain { text, offset } => {
                    if let Some(prop) = text.strip_prefix(AD_HOC_PROP_MARKER) {
                        // Overrides accumulate in encounter order after any
                        // pre-seeded entries; they produce no child node.
                        ad_hoc_props.push(prop.to_string());
                        continue;
                    }
                    if let Some((_, rest)) = text.split_once(':')
                        && rest.is_empty()
                    {
                        return Err(ResolveError::Parse {
                            alias: invoked.name.clone(),
                            token: text,
                            offset,
                            reason: "scope qualifier with empty target".to_string(),
                        });
                    }
                    let candidate = Script::parse(&text, scope);
                    let raw_value = if candidate.scope == *scope {
                        unparsed_aliases.get(&candidate.name).cloned()
                    } else {
                        self.raw_aliases_for(&candidate.scope)?
                            .get(&candidate.name)
                            .cloned()
                    };
                    match raw_value {
                        // Not a known alias: a literal single-word script.
                        None => scripts.push(Invocation::Script(candidate)),
                        Some(value) => {
                            let child = self.expand_reference(
                                scope,
                                invoked,
                                candidate,
                                &value,
                                unparsed_aliases,
                                graph,
                                resolved_cache,
                                ad_hoc_props,
                            )?;
                            scripts.push(Invocation::Alias(child));
                        }
                    }
                }
            }
        }

        Ok(Alias {
            name: invoked.name.clone(),
            unparsed_name: invoked.unparsed_name.clone(),
            scope: scope.clone(),
            scripts,
            ad_hoc_props: ad_hoc_props.clone(),
        })
    }

    /// Expands one recursive alias reference from `invoked` to `candidate`.
    /// Registers the edge in the cycle graph before any expansion, so a
    /// self- or mutually-referencing chain fails the moment it is closed,
    /// and reuses the resolved cache so a diamond reference resolves a given
    /// (scope, name) pair exactly once.
    fn expand_reference(
        &mut self,
        scope: &Scope,
        invoked: &Script,
        candidate: Script,
        raw_value: &str,
        unparsed_aliases: &HashMap<String, String>,
        graph: &mut DirectedGraph<String>,
        resolved_cache: &mut HashMap<(Scope, String), Arc<Alias>>,
        ad_hoc_props: &mut Vec<String>,
    ) -> Result<Arc<Alias>, ResolveError> {
        let from = invoked.qualified_name();
        let to = candidate.qualified_name();
        graph.add_vertex(from.clone());
        graph.add_vertex(to.clone());
        graph
            .add_edge(&from, &to)
            .map_err(|e| ResolveError::CircularReference {
                cycle: e.cycle_to_string(),
            })?;

        let cache_key = (candidate.scope.clone(), candidate.name.clone());
        if let Some(existing) = resolved_cache.get(&cache_key) {
            log::debug!("Reusing already-resolved alias '{}'.", to);
            return Ok(Arc::clone(existing));
        }

        let child = if candidate.scope == *scope {
            self.parse_alias(
                scope,
                &candidate,
                raw_value,
                unparsed_aliases,
                graph,
                resolved_cache,
                ad_hoc_props,
            )?
        } else {
            // The reference switches scope for this subtree only; its
            // definitions come from the target scope's mapping.
            let other_scope = candidate.scope.clone();
            let other_aliases = self.raw_aliases_for(&other_scope)?;
            self.parse_alias(
                &other_scope,
                &candidate,
                raw_value,
                &other_aliases,
                graph,
                resolved_cache,
                ad_hoc_props,
            )?
        };
        let shared = Arc::new(child);
        resolved_cache.insert(cache_key, Arc::clone(&shared));
        Ok(shared)
    }
}

// MARK: --- UNIT TESTS ---

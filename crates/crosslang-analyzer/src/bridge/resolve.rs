//! Request-level entry points: classify, match, expand, deduplicate.

use std::{collections::HashSet, sync::Arc};

use tower_lsp::lsp_types::{Location, Position, Url};
use tracing::{debug, warn};

use crate::bridge::{
    classify::{Classification, classify},
    guard::{GuardToken, ReentrancyGuard},
    matchers::{MatchContext, match_declarations},
    model::{Candidate, Language},
    readiness::ReadinessPolicy,
    source::SymbolSource,
};

/// Options read from configuration for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub enabled: bool,
    pub strict_export: bool,
    pub readiness: ReadinessPolicy,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            strict_export: false,
            readiness: ReadinessPolicy::default(),
        }
    }
}

/// Answers cross-language navigation requests against a [`SymbolSource`].
///
/// Results only ever contain locations in the other language; same-language
/// results are left to the native analyzers. No method returns an error: a
/// failure anywhere yields fewer (or no) locations.
pub struct CrossLanguageResolver<S: ?Sized> {
    source: Arc<S>,
    guard: ReentrancyGuard,
}

impl<S: SymbolSource + ?Sized> CrossLanguageResolver<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            guard: ReentrancyGuard::new(),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Counterpart declarations plus every reference to them.
    pub async fn resolve_references(
        &self,
        uri: &Url,
        position: Position,
        options: &ResolveOptions,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        match self.begin(options) {
            Some(session) => session.references(uri, position, is_cancelled).await,
            None => Vec::new(),
        }
    }

    /// Counterpart declarations; for interfaces with methods, also the
    /// target language's implementations of each matched interface.
    pub async fn resolve_implementations(
        &self,
        uri: &Url,
        position: Position,
        options: &ResolveOptions,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        match self.begin(options) {
            Some(session) => session.implementations(uri, position, is_cancelled).await,
            None => Vec::new(),
        }
    }

    /// The matched counterpart declarations themselves.
    pub async fn resolve_counterparts(
        &self,
        uri: &Url,
        position: Position,
        options: &ResolveOptions,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        match self.begin(options) {
            Some(session) => session.counterparts(uri, position, is_cancelled).await,
            None => Vec::new(),
        }
    }

    /// Admit one request, or `None` when resolution is disabled or another
    /// request already holds the guard.
    ///
    /// Hosts that track request freshness start tracking only after admission.
    pub fn begin(
        &self,
        options: &ResolveOptions,
    ) -> Option<ResolveSession<'_, S>> {
        if !options.enabled {
            return None;
        }
        let Some(token) = self.guard.try_enter() else {
            debug!("[resolve] request already in flight; answering with no result");
            return None;
        };
        Some(ResolveSession {
            resolver: self,
            options: *options,
            _token: token,
        })
    }
}

/// One admitted request. The reentrancy guard is released when it drops.
pub struct ResolveSession<'a, S: ?Sized> {
    resolver: &'a CrossLanguageResolver<S>,
    options: ResolveOptions,
    _token: GuardToken<'a>,
}

impl<S: SymbolSource + ?Sized> ResolveSession<'_, S> {
    pub async fn references(
        &self,
        uri: &Url,
        position: Position,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        let Some((classification, declarations)) = self.matched(uri, position, is_cancelled).await else {
            return Vec::new();
        };

        let source = &self.resolver.source;
        let mut locations = LocationSet::default();
        for declaration in &declarations {
            locations.insert(declaration.location());
            if is_cancelled() {
                continue;
            }
            match source.references(&declaration.uri, declaration.symbol.selection_range.start).await {
                Ok(references) => locations.extend(references),
                Err(error) => warn!("[references] lookup for '{}' failed: {error}", declaration.symbol.name),
            }
        }
        locations.into_language(classification.language().counterpart())
    }

    pub async fn implementations(
        &self,
        uri: &Url,
        position: Position,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        let Some((classification, declarations)) = self.matched(uri, position, is_cancelled).await else {
            return Vec::new();
        };

        let source = &self.resolver.source;
        let expand = matches!(&classification, Classification::Interface(info) if info.has_methods);
        let mut locations = LocationSet::default();
        for declaration in &declarations {
            locations.insert(declaration.location());
            if !expand || is_cancelled() {
                continue;
            }
            match source.implementations(&declaration.uri, declaration.symbol.selection_range.start).await {
                Ok(implementations) => locations.extend(implementations),
                Err(error) => warn!("[implementations] lookup for '{}' failed: {error}", declaration.symbol.name),
            }
        }
        locations.into_language(classification.language().counterpart())
    }

    pub async fn counterparts(
        &self,
        uri: &Url,
        position: Position,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Vec<Location> {
        let Some((classification, declarations)) = self.matched(uri, position, is_cancelled).await else {
            return Vec::new();
        };

        let mut locations = LocationSet::default();
        locations.extend(declarations.iter().map(Candidate::location));
        locations.into_language(classification.language().counterpart())
    }

    async fn matched(
        &self,
        uri: &Url,
        position: Position,
        is_cancelled: &(dyn Fn() -> bool + Send + Sync),
    ) -> Option<(Classification, Vec<Candidate>)> {
        let source = &*self.resolver.source;
        let Some(classification) = classify(source, uri, position).await else {
            debug!("[resolve] nothing matchable at {uri}:{}:{}", position.line + 1, position.character + 1);
            return None;
        };

        let ctx = MatchContext {
            source,
            strict_export: self.options.strict_export,
            readiness: self.options.readiness,
            is_cancelled,
        };
        let declarations = match_declarations(&ctx, &classification).await;
        if declarations.is_empty() {
            return None;
        }
        Some((classification, declarations))
    }
}

/// Insertion-ordered locations, unique by file and start position.
#[derive(Default)]
struct LocationSet {
    seen: HashSet<(Url, u32, u32)>,
    locations: Vec<Location>,
}

impl LocationSet {
    fn insert(
        &mut self,
        location: Location,
    ) {
        let key = (location.uri.clone(), location.range.start.line, location.range.start.character);
        if self.seen.insert(key) {
            self.locations.push(location);
        }
    }

    fn extend(
        &mut self,
        locations: impl IntoIterator<Item = Location>,
    ) {
        for location in locations {
            self.insert(location);
        }
    }

    fn into_language(
        self,
        language: Language,
    ) -> Vec<Location> {
        self.locations.into_iter().filter(|location| Language::from_uri(&location.uri) == Some(language)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/resolve_tests.rs"]
mod tests;

//! Decides whether two CSS stylesheets are semantically equivalent
//! (spec.md §1): same cascaded properties under the same conditions,
//! independent of selector spelling, declaration order, or at-rule
//! nesting shape.
//!
//! [`compare_paths`] is the crate's single entry point; everything else
//! is exported for the CLI and for tests.

pub mod ast;
pub mod color;
pub mod equivalence;
pub mod error;
pub mod import;
pub mod model;
pub mod parser;
pub mod property;
pub mod selector;
pub mod value;

use std::path::Path;

use ast::AstNode;
use error::EngineError;
use import::{FileSystemProvider, LoadOutcome, Loader, SourceProvider};
use model::Engine;

/// Builds an [`Engine`] straight from CSS text, with no `@import`
/// resolution (there is no base path to resolve relative URIs against).
pub fn build_engine_from_str(css: &str) -> Engine {
  let nodes = parser::parse_stylesheet(css);
  Engine::build(&nodes)
}

/// Builds an [`Engine`] from a stylesheet on disk, recursively resolving
/// `@import` through the default [`FileSystemProvider`] (spec.md §5).
pub fn build_engine_from_path(path: &Path) -> Result<Engine, EngineError> {
  build_engine_from_path_with_provider(path, &FileSystemProvider)
}

/// Same as [`build_engine_from_path`], but through a caller-supplied
/// [`SourceProvider`] — used by tests to avoid touching the filesystem.
pub fn build_engine_from_path_with_provider<P: SourceProvider>(
  path: &Path,
  provider: &P,
) -> Result<Engine, EngineError> {
  let text = provider.read(path).map_err(|e| EngineError::Io(path.to_path_buf(), e))?;
  let nodes = parser::parse_stylesheet(&text);
  let loader = Loader::new(provider);
  let resolved = resolve_imports(nodes, path, &loader, 0);
  Ok(Engine::build(&resolved))
}

/// Top-level entry point: are the two stylesheets at `a` and `b`
/// semantically equivalent?
pub fn compare_paths(a: &Path, b: &Path) -> Result<bool, EngineError> {
  let engine_a = build_engine_from_path(a)?;
  let engine_b = build_engine_from_path(b)?;
  Ok(Engine::equivalent(&engine_a, &engine_b))
}

/// Splices every `@import` in `nodes` with the (recursively resolved)
/// contents of the file it names, wrapping the spliced nodes in a
/// `@media` block when the import carried a query list.
///
/// A file that cannot be read is silently dropped (spec.md §7); one that
/// would exceed [`import::MAX_IMPORT_DEPTH`] is instead kept as an
/// unsupported `@import` entity so two stylesheets differing only past the
/// depth bound are not reported equivalent (spec.md §5).
fn resolve_imports<P: SourceProvider>(nodes: Vec<AstNode>, base: &Path, loader: &Loader<P>, depth: usize) -> Vec<AstNode> {
  let mut out = Vec::with_capacity(nodes.len());
  for node in nodes {
    match node {
      AstNode::Import { resolved_uri, query } => match loader.load(base, &resolved_uri, depth) {
        LoadOutcome::Loaded(child_path, text) => {
          let child_nodes = parser::parse_stylesheet(&text);
          let resolved = resolve_imports(child_nodes, &child_path, loader, depth + 1);
          let is_unconditional = query.is_empty() || (query.len() == 1 && query[0] == property::ALL_CONDITION);
          if is_unconditional {
            out.extend(resolved);
          } else {
            out.push(AstNode::Media { query, children: resolved });
          }
        }
        LoadOutcome::DepthExceeded => {
          log::warn!("@import depth limit reached, treating as unsupported: {}", resolved_uri);
          out.push(AstNode::Directive {
            name: "@import".to_string(),
            value: None,
            resolved_value: Some(resolved_uri),
            children: vec![],
          });
        }
        LoadOutcome::NotFound => {
          log::debug!("skipping unreadable @import: {}", resolved_uri);
        }
      },
      other => out.push(other),
    }
  }
  out
}

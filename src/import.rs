//! `@import` resolution (spec.md §4.1 "Import" row, §5 resource model).
//!
//! A small trait for reading a referenced file plus a depth-bounded
//! recursive loader; this loader is short-lived per compare, so each load
//! just returns an owned `String` rather than anything arena-backed.

use std::path::{Path, PathBuf};

/// Recursion depth past which further `@import`s are silently dropped
/// (spec.md §5: resource bound on import recursion).
pub const MAX_IMPORT_DEPTH: usize = 32;

pub trait SourceProvider {
  /// Reads the full text of `path`. `Err` (e.g. not found) is treated by
  /// [`Loader::load`] as "silently skip", per spec.md's import error policy.
  fn read(&self, path: &Path) -> std::io::Result<String>;

  /// Resolves an `@import` URI relative to the file that referenced it.
  fn resolve(&self, base: &Path, uri: &str) -> PathBuf {
    let uri = uri.trim_matches(|c| c == '"' || c == '\'');
    match base.parent() {
      Some(dir) => dir.join(uri),
      None => PathBuf::from(uri),
    }
  }
}

/// The default [`SourceProvider`]: reads files straight off disk.
#[derive(Debug, Default)]
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
  fn read(&self, path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
  }
}

/// Tracks `@import` recursion depth while resolving one stylesheet's tree.
pub struct Loader<'p, P: SourceProvider> {
  provider: &'p P,
  max_depth: usize,
}

/// The result of attempting to load one `@import` target (spec.md §5, §7).
pub enum LoadOutcome {
  Loaded(PathBuf, String),
  /// Depth bound reached: the caller should record this import as an
  /// unsupported entity rather than silently dropping it.
  DepthExceeded,
  /// The file could not be read (not found, permission, etc.): the caller
  /// should silently skip this import.
  NotFound,
}

impl<'p, P: SourceProvider> Loader<'p, P> {
  pub fn new(provider: &'p P) -> Loader<'p, P> {
    Loader { provider, max_depth: MAX_IMPORT_DEPTH }
  }

  pub fn with_max_depth(provider: &'p P, max_depth: usize) -> Loader<'p, P> {
    Loader { provider, max_depth }
  }

  /// Resolves `uri` against `base` and reads it.
  pub fn load(&self, base: &Path, uri: &str, depth: usize) -> LoadOutcome {
    if depth >= self.max_depth {
      return LoadOutcome::DepthExceeded;
    }
    let path = self.provider.resolve(base, uri);
    match self.provider.read(&path) {
      Ok(text) => LoadOutcome::Loaded(path, text),
      Err(_) => LoadOutcome::NotFound,
    }
  }
}

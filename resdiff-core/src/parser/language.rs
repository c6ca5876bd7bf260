//! Loading tree-sitter grammars.
//!
//! ReScript has no grammar crate on crates.io, so the grammar is loaded at
//! runtime from a compiled shared library (the same `.so`/`.dylib` the
//! tree-sitter CLI builds into its cache). Statically linked grammars can be
//! wrapped with [`LoadedLanguage::from_language`].

use libloading::Library;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tree_sitter::Language;
use tree_sitter_language::LanguageFn;

use crate::error::{DiffError, Result};

/// Exported symbol of the ReScript grammar.
pub const DEFAULT_SYMBOL: &str = "tree_sitter_rescript";

/// A tree-sitter language together with the library that provides it.
///
/// The language points into the library's memory, so the library is kept
/// alive (shared) for as long as any clone of this value or any tree parsed
/// with it exists.
#[derive(Clone)]
pub struct LoadedLanguage {
    language: Language,
    name: String,
    // Dropped after `language`.
    library: Option<Arc<Library>>,
}

impl LoadedLanguage {
    /// Wrap a statically linked language, checking ABI compatibility.
    pub fn from_language(language: Language, name: impl Into<String>) -> Result<Self> {
        check_compatible(&language)?;
        Ok(Self {
            language,
            name: name.into(),
            library: None,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Label used in logs: the library path or the given name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn library(&self) -> Option<Arc<Library>> {
        self.library.clone()
    }
}

impl fmt::Debug for LoadedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedLanguage")
            .field("name", &self.name)
            .field("dynamic", &self.library.is_some())
            .finish()
    }
}

/// Load a grammar from a shared library exporting `symbol`.
pub fn load_language(path: &Path, symbol: &str) -> Result<LoadedLanguage> {
    let load_error = |message: String| DiffError::GrammarLoad {
        path: path.display().to_string(),
        message,
    };

    // SAFETY: loading a library runs its initializers. Grammar libraries are
    // plain C objects generated by tree-sitter with no initialization logic.
    let library = unsafe { Library::new(path) }.map_err(|e| load_error(e.to_string()))?;

    // SAFETY: tree-sitter grammars export `const TSLanguage *tree_sitter_<name>(void)`,
    // which matches the requested function type. The returned pointer refers to
    // static data inside `library`, which `LoadedLanguage` keeps alive.
    let language = unsafe {
        let constructor = library
            .get::<unsafe extern "C" fn() -> *const ()>(symbol.as_bytes())
            .map_err(|e| load_error(format!("missing symbol {}: {}", symbol, e)))?;
        Language::new(LanguageFn::from_raw(*constructor))
    };

    check_compatible(&language)?;
    debug!(path = %path.display(), symbol, "loaded grammar");

    Ok(LoadedLanguage {
        language,
        name: path.display().to_string(),
        library: Some(Arc::new(library)),
    })
}

/// Check that this build of tree-sitter can use `language`.
pub fn check_compatible(language: &Language) -> Result<()> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(language)
        .map_err(|e| DiffError::IncompatibleGrammar(e.to_string()))
}

/// Shared-library file name for a grammar, e.g. `rescript.so` on Linux.
pub fn library_file_name(grammar: &str) -> String {
    format!("{}.{}", grammar, std::env::consts::DLL_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_language_is_compatible() {
        let loaded =
            LoadedLanguage::from_language(tree_sitter_rust::LANGUAGE.into(), "rust").unwrap();
        assert_eq!(loaded.name(), "rust");
        assert!(loaded.library().is_none());
        assert!(format!("{:?}", loaded).contains("dynamic: false"));
    }

    #[test]
    fn test_missing_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(library_file_name("rescript"));

        let err = load_language(&path, DEFAULT_SYMBOL).unwrap_err();
        assert!(matches!(err, DiffError::GrammarLoad { .. }));
        assert!(err.to_string().contains("rescript"));
    }

    #[test]
    fn test_not_a_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(library_file_name("broken"));
        std::fs::write(&path, "not a shared object").unwrap();

        let err = load_language(&path, DEFAULT_SYMBOL).unwrap_err();
        assert!(matches!(err, DiffError::GrammarLoad { .. }));
    }

    #[test]
    fn test_library_file_name() {
        let name = library_file_name("rescript");
        assert!(name.starts_with("rescript."));
        assert!(name.len() > "rescript.".len());
    }
}

//! Dynamic loading of generated form modules
//!
//! A form compiler emits one shared library per set of forms; each library
//! exports `form_<name>` / `expression_<name>` descriptor statics and a
//! `ufcx_abi_version` getter. [`FormModule`] opens such a library, checks
//! the interface version before trusting anything else in it, and hands out
//! validated views whose lifetimes are tied to the module handle.
//!
//! [`FormRegistry`] keeps loaded modules available by name for the rest of
//! the process, so assembly code can look forms up without threading module
//! handles around.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use libloading::Library;
use tracing::{debug, info, warn};
use ufcx::{UfcxExpression, UfcxForm};

use crate::error::{LoaderError, Result};
use crate::view::{ExpressionView, FormView};

/// Symbol of the interface version getter every generated module exports
const ABI_VERSION_SYMBOL: &[u8] = b"ufcx_abi_version";

/// A loaded generated module
///
/// The module owns its `libloading::Library`; every view handed out borrows
/// from `&self`, so descriptor data cannot outlive the library that backs
/// it. The underlying data is immutable, making the module safe to share
/// across threads.
pub struct FormModule {
    library: Library,
    path: PathBuf,
    abi_version: u32,
}

impl FormModule {
    /// Open a generated module and check its interface version.
    ///
    /// Fails if the library cannot be loaded, exports no version getter, or
    /// was generated against an incompatible interface version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let library = unsafe { Library::new(&path) }.map_err(|source| LoaderError::LibraryLoad {
            path: path.clone(),
            source,
        })?;

        let abi_version = unsafe {
            let getter = library
                .get::<unsafe extern "C" fn() -> u32>(ABI_VERSION_SYMBOL)
                .map_err(|source| LoaderError::MissingSymbol {
                    symbol: String::from_utf8_lossy(ABI_VERSION_SYMBOL).into_owned(),
                    source,
                })?;
            getter()
        };

        if !ufcx::is_compatible(abi_version) {
            return Err(LoaderError::VersionMismatch {
                module: abi_version,
                host: ufcx::ABI_VERSION,
            });
        }

        debug!(path = %path.display(), abi_version, "loaded form module");

        Ok(Self {
            library,
            path,
            abi_version,
        })
    }

    /// Path the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Packed interface version the module was generated against
    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Resolve and validate the form exported as `form_<name>`
    pub fn form(&self, name: &str) -> Result<FormView<'_>> {
        let raw: &UfcxForm = unsafe { self.resolve_static(&format!("form_{name}"))? };
        FormView::new(raw)
    }

    /// Resolve and validate the expression exported as `expression_<name>`
    pub fn expression(&self, name: &str) -> Result<ExpressionView<'_>> {
        let raw: &UfcxExpression = unsafe { self.resolve_static(&format!("expression_{name}"))? };
        ExpressionView::new(raw)
    }

    /// Resolve an exported descriptor static.
    ///
    /// # Safety
    ///
    /// The symbol must actually be a static of type `T`; the interface
    /// version check on open is the only guard against a mismatched module.
    unsafe fn resolve_static<T>(&self, symbol: &str) -> Result<&T> {
        let address = self
            .library
            .get::<*const T>(symbol.as_bytes())
            .map_err(|source| LoaderError::MissingSymbol {
                symbol: symbol.to_owned(),
                source,
            })?;
        Ok(&**address)
    }
}

impl std::fmt::Debug for FormModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormModule")
            .field("path", &self.path)
            .field("abi_version", &self.abi_version)
            .finish_non_exhaustive()
    }
}

/// Registry of loaded modules, keyed by module name
#[derive(Debug, Default)]
pub struct FormRegistry {
    modules: HashMap<String, Arc<FormModule>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Register a module under a name, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, module: Arc<FormModule>) {
        let name = name.into();
        info!(name = %name, path = %module.path().display(), "registered form module");
        self.modules.insert(name, module);
    }

    /// Look a module up by name
    pub fn get(&self, name: &str) -> Result<Arc<FormModule>> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::ModuleNotFound(name.to_owned()))
    }

    /// Names of all registered modules
    pub fn names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Whether a module is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Load every shared library in a directory, keyed by file stem.
    ///
    /// Modules that fail to load or fail the version check are skipped with
    /// a warning; the returned list names the modules that registered.
    pub fn load_from_directory(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let entries = std::fs::read_dir(path).map_err(|source| LoaderError::ReadDirectory {
            path: path.to_path_buf(),
            source,
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoaderError::ReadDirectory {
                path: path.to_path_buf(),
                source,
            })?;
            let file_path = entry.path();

            if !has_module_extension(&file_path) {
                continue;
            }
            let Some(stem) = file_path.file_stem() else {
                continue;
            };
            let name = stem.to_string_lossy().into_owned();

            match FormModule::open(&file_path) {
                Ok(module) => {
                    self.register(name.clone(), Arc::new(module));
                    loaded.push(name);
                }
                Err(error) => {
                    warn!(path = %file_path.display(), %error, "skipping form module");
                }
            }
        }

        Ok(loaded)
    }
}

fn has_module_extension(path: &Path) -> bool {
    let Some(extension) = path.extension() else {
        return false;
    };
    let extension = extension.to_string_lossy();

    #[cfg(target_os = "macos")]
    return extension == "dylib";
    #[cfg(target_os = "linux")]
    return extension == "so";
    #[cfg(target_os = "windows")]
    return extension == "dll";
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return extension == "so" || extension == "dylib" || extension == "dll";
}

/// Process-wide registry
static FORM_REGISTRY: LazyLock<Mutex<FormRegistry>> = LazyLock::new(|| Mutex::new(FormRegistry::new()));

/// Register a module in the process-wide registry
pub fn register_module(name: impl Into<String>, module: Arc<FormModule>) {
    let mut registry = FORM_REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.register(name, module);
}

/// Look a module up in the process-wide registry
pub fn get_module(name: &str) -> Result<Arc<FormModule>> {
    let registry = FORM_REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.get(name)
}

/// Load every module in a directory into the process-wide registry
pub fn load_modules_from_directory(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut registry = FORM_REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.load_from_directory(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_fails_for_missing_library() {
        let result = FormModule::open("/nonexistent/forms.so");
        assert!(matches!(result, Err(LoaderError::LibraryLoad { .. })));
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let registry = FormRegistry::new();
        assert!(!registry.contains("poisson"));
        assert!(matches!(registry.get("poisson"), Err(LoaderError::ModuleNotFound(name)) if name == "poisson"));
    }

    #[test]
    fn test_load_from_missing_directory() {
        let mut registry = FormRegistry::new();
        let result = registry.load_from_directory("/nonexistent/module-dir");
        assert!(matches!(result, Err(LoaderError::ReadDirectory { .. })));
    }

    #[test]
    fn test_module_extension_filter() {
        #[cfg(target_os = "linux")]
        {
            assert!(has_module_extension(Path::new("forms.so")));
            assert!(!has_module_extension(Path::new("forms.dylib")));
        }
        #[cfg(target_os = "macos")]
        {
            assert!(has_module_extension(Path::new("forms.dylib")));
            assert!(!has_module_extension(Path::new("forms.so")));
        }
        assert!(!has_module_extension(Path::new("forms.txt")));
        assert!(!has_module_extension(Path::new("forms")));
    }
}

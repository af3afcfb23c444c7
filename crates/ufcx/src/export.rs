//! Export macros for generated modules
//!
//! Generated form code uses these macros to put its descriptors and the
//! interface version under stable, non-mangled symbol names, so a
//! separately compiled consumer can resolve them with `dlsym`-style lookup.

/// Export the interface version this module was generated against.
///
/// Expands to a `ufcx_abi_version` function under C linkage; the loader
/// calls it before touching any other symbol in the module.
#[macro_export]
macro_rules! define_ufcx_abi_version {
    () => {
        #[no_mangle]
        pub unsafe extern "C" fn ufcx_abi_version() -> u32 {
            $crate::ABI_VERSION
        }
    };
}

/// Export a form descriptor as a non-mangled static.
///
/// The symbol name is the loader-visible form name prefixed with `form_`,
/// e.g. `export_form!(form_poisson, POISSON)` for a form loadable as
/// `"poisson"`.
#[macro_export]
macro_rules! export_form {
    ($symbol:ident, $form:expr) => {
        #[no_mangle]
        pub static $symbol: $crate::UfcxForm = $form;
    };
}

/// Export an expression descriptor as a non-mangled static.
///
/// The symbol name is the loader-visible expression name prefixed with
/// `expression_`.
#[macro_export]
macro_rules! export_expression {
    ($symbol:ident, $expression:expr) => {
        #[no_mangle]
        pub static $symbol: $crate::UfcxExpression = $expression;
    };
}

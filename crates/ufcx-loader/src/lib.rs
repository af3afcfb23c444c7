//! # UFCx loader
//!
//! Host-side consumer of the `ufcx` interface: opens shared libraries
//! emitted by a form compiler, checks that they were generated against a
//! compatible interface version, and exposes their form and expression
//! descriptors through validated views.
//!
//! The raw descriptors deliberately carry no error channel, so all checking
//! happens here, once, before assembly code touches the data:
//!
//! - [`FormModule`] resolves `form_<name>` / `expression_<name>` symbols
//!   and rejects incompatible modules at open time.
//! - [`FormView`] / [`ExpressionView`] / [`IntegralView`] verify the
//!   structural invariants (non-negative counts, monotonic integral
//!   offsets, non-null backing arrays) and then lend the data out as plain
//!   slices and strings.
//! - [`FormMetadata`] / [`ExpressionMetadata`] are owned serde snapshots of
//!   the same data for tooling and debugging.
//!
//! ```no_run
//! use ufcx_loader::FormModule;
//!
//! # fn main() -> ufcx_loader::Result<()> {
//! let module = FormModule::open("generated/poisson.so")?;
//! let form = module.form("poisson")?;
//! println!("{} (rank {})", form.signature(), form.rank());
//!
//! let kernel = form
//!     .integral(ufcx::IntegralType::Cell, 0)?
//!     .kernel::<f64>()
//!     .expect("module was generated without a float64 kernel");
//! # let _ = kernel;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod metadata;
pub mod module;
pub mod view;

pub use error::{LoaderError, Result};
pub use metadata::{ExpressionMetadata, FormMetadata, IntegralMetadata, KernelAvailability};
pub use module::{
    get_module, load_modules_from_directory, register_module, FormModule, FormRegistry,
};
pub use view::{ExpressionView, FormView, IntegralView};

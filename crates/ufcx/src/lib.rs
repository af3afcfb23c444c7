//! # UFCx
//!
//! `ufcx` defines the interface between code generated by a finite-element
//! form compiler and the numerical library that assembles global tensors
//! from it. Both sides depend on this crate: generated modules export
//! [`UfcxForm`] / [`UfcxExpression`] descriptors and their tabulation
//! kernels through it, and the assembler reads them back through the same
//! definitions.
//!
//! The interface is plain data under C linkage. There is no scheduler, no
//! state, and no error channel: kernels are pure functions over
//! caller-supplied buffers, assumed to succeed on well-formed input.
//! Changes to any struct or signature here must be reflected on both sides
//! of the boundary and carry an interface version bump.
//!
//! ## Layout
//!
//! - [`abi`] — the `#[repr(C)]` descriptors: [`IntegralType`],
//!   [`UfcxIntegral`], [`UfcxExpression`], [`UfcxForm`].
//! - [`tabulate`] — the four kernel signatures and the [`Scalar`] seam for
//!   selecting a variant generically.
//! - [`version`] — the interface version quadruple and compatibility check.
//! - [`export`] — macros generated modules use to export their symbols.
//!
//! The loading and validation of generated modules lives in the companion
//! `ufcx-loader` crate; this crate stays dependency-light so generated code
//! can link it without pulling in the host stack.

pub mod abi;
pub mod export;
pub mod tabulate;
pub mod version;

pub use abi::{IntegralType, UfcxExpression, UfcxForm, UfcxIntegral, NUM_INTEGRAL_TYPES};
pub use tabulate::{
    Scalar, TabulateTensor, TabulateTensorComplex128, TabulateTensorComplex64, TabulateTensorFloat32,
    TabulateTensorFloat64,
};
pub use version::{
    is_compatible, pack_abi_version, version_string, ABI_VERSION, UFCX_VERSION, UFCX_VERSION_MAINTENANCE,
    UFCX_VERSION_MAJOR, UFCX_VERSION_MINOR, UFCX_VERSION_RELEASE,
};

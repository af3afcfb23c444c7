//! Plain-data structures of the UFCx interface
//!
//! These structs are the contract between a form compiler's generated code
//! and the assembly library that consumes it. Both sides compile them
//! independently, so every struct is `#[repr(C)]` and field order follows
//! the interface definition exactly; fields must never be added, removed,
//! or reordered without an interface version bump.
//!
//! Nothing here carries behavior. Generated modules export statics of these
//! types under stable C linkage (see [`export_form!`]), and the pointed-to
//! arrays and strings live in the module's read-only data for as long as it
//! stays loaded.
//!
//! [`export_form!`]: crate::export_form

use std::os::raw::{c_char, c_int};

use crate::tabulate::{
    TabulateTensorComplex128, TabulateTensorComplex64, TabulateTensorFloat32, TabulateTensorFloat64,
};

/// Kind of mesh entity an integral kernel applies to.
///
/// The discriminant values are part of the interface and must stay stable
/// across releases.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegralType {
    /// Integral over a cell
    Cell = 0,
    /// Integral over an exterior facet
    ExteriorFacet = 1,
    /// Integral over an interior facet
    InteriorFacet = 2,
}

/// Number of integral kinds
pub const NUM_INTEGRAL_TYPES: usize = 3;

impl IntegralType {
    /// All kinds, in discriminant order
    pub const ALL: [IntegralType; NUM_INTEGRAL_TYPES] =
        [IntegralType::Cell, IntegralType::ExteriorFacet, IntegralType::InteriorFacet];

    /// Map a raw discriminant back to a kind
    pub fn from_raw(value: c_int) -> Option<Self> {
        match value {
            0 => Some(IntegralType::Cell),
            1 => Some(IntegralType::ExteriorFacet),
            2 => Some(IntegralType::InteriorFacet),
            _ => None,
        }
    }

    /// Stable lowercase name, as used in generated metadata
    pub fn name(self) -> &'static str {
        match self {
            IntegralType::Cell => "cell",
            IntegralType::ExteriorFacet => "exterior_facet",
            IntegralType::InteriorFacet => "interior_facet",
        }
    }
}

/// An integral kernel over one kind of mesh entity, with its four numeric
/// variants and the flags the assembler needs to drive it.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UfcxIntegral {
    /// Flags marking which of the parent form's coefficients this integral
    /// reads; length `num_coefficients` of the parent form
    pub enabled_coefficients: *const bool,
    /// Single precision real kernel, if generated
    pub tabulate_tensor_float32: Option<TabulateTensorFloat32>,
    /// Double precision real kernel, if generated
    pub tabulate_tensor_float64: Option<TabulateTensorFloat64>,
    /// Single precision complex kernel, if generated
    pub tabulate_tensor_complex64: Option<TabulateTensorComplex64>,
    /// Double precision complex kernel, if generated
    pub tabulate_tensor_complex128: Option<TabulateTensorComplex128>,
    /// Whether the kernel reads the quadrature permutation argument
    pub needs_facet_permutations: bool,
    /// Hash of the coordinate element used for the geometry mapping
    pub coordinate_element_hash: u64,
}

/// A standalone evaluable quantity: not a full form, but a compiled
/// expression tabulated at a fixed set of evaluation points.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UfcxExpression {
    /// Single precision real kernel, if generated.
    ///
    /// Output dimensions: `A[num_points][num_components][num_argument_dofs]`.
    pub tabulate_tensor_float32: Option<TabulateTensorFloat32>,
    /// Double precision real kernel, if generated
    pub tabulate_tensor_float64: Option<TabulateTensorFloat64>,
    /// Single precision complex kernel, if generated
    pub tabulate_tensor_complex64: Option<TabulateTensorComplex64>,
    /// Double precision complex kernel, if generated
    pub tabulate_tensor_complex128: Option<TabulateTensorComplex128>,
    /// Number of coefficients
    pub num_coefficients: c_int,
    /// Number of constants
    pub num_constants: c_int,
    /// Original position of each coefficient in the source expression;
    /// length `num_coefficients`
    pub original_coefficient_positions: *const c_int,
    /// Coefficient names; length `num_coefficients`
    pub coefficient_names: *const *const c_char,
    /// Constant names; length `num_constants`
    pub constant_names: *const *const c_char,
    /// Number of evaluation points
    pub num_points: c_int,
    /// Topological dimension of the entity the points live on
    pub entity_dimension: c_int,
    /// Evaluation point coordinates, `points[num_points][entity_dimension]`
    pub points: *const f64,
    /// Value shape of the expression; length `num_components`
    pub value_shape: *const c_int,
    /// Number of components of the value shape
    pub num_components: c_int,
    /// Rank, i.e. number of arguments
    pub rank: c_int,
}

/// A compiled variational form: a signature, its argument and coefficient
/// layout, and the integral kernels that assemble it.
///
/// The form maps `r` argument spaces and `n` fixed coefficient functions to
/// a rank-`r` global tensor; this struct carries everything the assembler
/// needs to drive that mapping except the mesh itself.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UfcxForm {
    /// String identifying the form
    pub signature: *const c_char,
    /// Rank of the global tensor (`r`)
    pub rank: c_int,
    /// Number of coefficients (`n`)
    pub num_coefficients: c_int,
    /// Number of constants
    pub num_constants: c_int,
    /// Original position of each coefficient in the source form; length
    /// `num_coefficients`
    pub original_coefficient_positions: *mut c_int,
    /// Coefficient names; length `num_coefficients`
    pub coefficient_name_map: *const *const c_char,
    /// Constant names; length `num_constants`
    pub constant_name_map: *const *const c_char,
    /// Finite element hash per argument then per coefficient: entry `i` is
    /// argument `i` for `i < rank`, coefficient `i - rank` otherwise; length
    /// `rank + num_coefficients`
    pub finite_element_hashes: *mut u64,
    /// All integrals of the form, ordered cell, exterior facet, interior
    /// facet; length `form_integral_offsets[NUM_INTEGRAL_TYPES]`
    pub form_integrals: *mut *mut UfcxIntegral,
    /// Subdomain ID per entry of `form_integrals`
    pub form_integral_ids: *mut c_int,
    /// Partition of `form_integrals` by integral kind, in discriminant
    /// order; length `NUM_INTEGRAL_TYPES + 1`, first entry 0, non-decreasing
    pub form_integral_offsets: *mut c_int,
}

// Generated data is immutable for the lifetime of the loaded module, so
// sharing these descriptors across threads is sound. Statics exported by
// `export_form!` also require Sync.
unsafe impl Send for UfcxIntegral {}
unsafe impl Sync for UfcxIntegral {}
unsafe impl Send for UfcxExpression {}
unsafe impl Sync for UfcxExpression {}
unsafe impl Send for UfcxForm {}
unsafe impl Sync for UfcxForm {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_type_values_are_stable() {
        assert_eq!(IntegralType::Cell as c_int, 0);
        assert_eq!(IntegralType::ExteriorFacet as c_int, 1);
        assert_eq!(IntegralType::InteriorFacet as c_int, 2);
        assert_eq!(IntegralType::ALL.len(), NUM_INTEGRAL_TYPES);
    }

    #[test]
    fn test_integral_type_from_raw() {
        for kind in IntegralType::ALL {
            assert_eq!(IntegralType::from_raw(kind as c_int), Some(kind));
        }
        assert_eq!(IntegralType::from_raw(3), None);
        assert_eq!(IntegralType::from_raw(-1), None);
    }

    #[test]
    fn test_integral_type_names() {
        assert_eq!(IntegralType::Cell.name(), "cell");
        assert_eq!(IntegralType::ExteriorFacet.name(), "exterior_facet");
        assert_eq!(IntegralType::InteriorFacet.name(), "interior_facet");
    }
}

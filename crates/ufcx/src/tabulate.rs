//! Tabulation kernel signatures
//!
//! A tabulation kernel computes a local element tensor from coefficient
//! values, constants, and cell geometry. Kernels are generated in up to four
//! numeric variants (real/complex x single/double precision); the set is
//! closed, so each variant gets a dedicated slot in [`UfcxIntegral`] and
//! [`UfcxExpression`] rather than any dynamic dispatch.
//!
//! Kernels perform no allocation and report no error. The caller allocates
//! the output tensor to the size implied by the associated element and rank,
//! and upholds every pointer invariant before the call.
//!
//! [`UfcxIntegral`]: crate::abi::UfcxIntegral
//! [`UfcxExpression`]: crate::abi::UfcxExpression

use std::os::raw::c_int;

use num_complex::Complex;

use crate::abi::{UfcxExpression, UfcxIntegral};

/// Tabulate a local tensor `A` with a compiled quadrature rule.
///
/// `T` is the scalar type of the tensor, coefficients, and constants; `R` is
/// the real type of the coordinate degrees of freedom (always real, also for
/// complex-valued kernels).
///
/// * `a` — output tensor, caller-allocated.
/// * `w` — coefficient values, `w[coefficient][restriction][dof]`. The
///   restriction dimension applies to interior facet integrals, where
///   coefficients restricted to both cells sharing the facet are provided.
/// * `c` — constant values, `c[constant][dim]`.
/// * `coordinate_dofs` — degrees of freedom of the coordinate element
///   defining the cell geometry,
///   `coordinate_dofs[restriction][num_dofs][3]`, with the restriction
///   dimension again only for interior facet integrals.
/// * `entity_local_index` — local index of the mesh entity to tabulate on;
///   used by facet integrals, null otherwise.
/// * `quadrature_permutation` — orientation code per facet side: for a code
///   `N`, `N / 2` is the number of rotations and `N % 2` the number of
///   reflections to apply to the facet. Size 2 for interior facet integrals
///   (one entry per adjacent cell), null for everything else.
pub type TabulateTensor<T, R> = unsafe extern "C" fn(
    a: *mut T,
    w: *const T,
    c: *const T,
    coordinate_dofs: *const R,
    entity_local_index: *const c_int,
    quadrature_permutation: *const u8,
);

/// Single precision real kernel
pub type TabulateTensorFloat32 = TabulateTensor<f32, f32>;

/// Double precision real kernel
pub type TabulateTensorFloat64 = TabulateTensor<f64, f64>;

/// Single precision complex kernel (real coordinate dofs)
pub type TabulateTensorComplex64 = TabulateTensor<Complex<f32>, f32>;

/// Double precision complex kernel (real coordinate dofs)
pub type TabulateTensorComplex128 = TabulateTensor<Complex<f64>, f64>;

mod sealed {
    use num_complex::Complex;

    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for Complex<f32> {}
    impl Sealed for Complex<f64> {}
}

/// Scalar types a tabulation kernel can be compiled for.
///
/// The trait ties each of the four numeric kinds to its kernel slot, so host
/// code generic over the scalar type can pull the matching variant out of an
/// integral or expression without touching the other three.
pub trait Scalar: sealed::Sealed + Copy + 'static {
    /// Real type of the coordinate degrees of freedom
    type Real: Copy + 'static;

    /// Kernel slot of this scalar type in an integral, if generated
    fn integral_kernel(integral: &UfcxIntegral) -> Option<TabulateTensor<Self, Self::Real>>;

    /// Kernel slot of this scalar type in an expression, if generated
    fn expression_kernel(expression: &UfcxExpression) -> Option<TabulateTensor<Self, Self::Real>>;
}

impl Scalar for f32 {
    type Real = f32;

    fn integral_kernel(integral: &UfcxIntegral) -> Option<TabulateTensorFloat32> {
        integral.tabulate_tensor_float32
    }

    fn expression_kernel(expression: &UfcxExpression) -> Option<TabulateTensorFloat32> {
        expression.tabulate_tensor_float32
    }
}

impl Scalar for f64 {
    type Real = f64;

    fn integral_kernel(integral: &UfcxIntegral) -> Option<TabulateTensorFloat64> {
        integral.tabulate_tensor_float64
    }

    fn expression_kernel(expression: &UfcxExpression) -> Option<TabulateTensorFloat64> {
        expression.tabulate_tensor_float64
    }
}

impl Scalar for Complex<f32> {
    type Real = f32;

    fn integral_kernel(integral: &UfcxIntegral) -> Option<TabulateTensorComplex64> {
        integral.tabulate_tensor_complex64
    }

    fn expression_kernel(expression: &UfcxExpression) -> Option<TabulateTensorComplex64> {
        expression.tabulate_tensor_complex64
    }
}

impl Scalar for Complex<f64> {
    type Real = f64;

    fn integral_kernel(integral: &UfcxIntegral) -> Option<TabulateTensorComplex128> {
        integral.tabulate_tensor_complex128
    }

    fn expression_kernel(expression: &UfcxExpression) -> Option<TabulateTensorComplex128> {
        expression.tabulate_tensor_complex128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use std::ptr;

    unsafe extern "C" fn stub_f32(
        a: *mut f32,
        _w: *const f32,
        _c: *const f32,
        _coordinate_dofs: *const f32,
        _entity_local_index: *const c_int,
        _quadrature_permutation: *const u8,
    ) {
        *a = 1.0;
    }

    unsafe extern "C" fn stub_f64(
        a: *mut f64,
        _w: *const f64,
        _c: *const f64,
        _coordinate_dofs: *const f64,
        _entity_local_index: *const c_int,
        _quadrature_permutation: *const u8,
    ) {
        *a = 2.0;
    }

    unsafe extern "C" fn stub_c64(
        a: *mut Complex<f32>,
        _w: *const Complex<f32>,
        _c: *const Complex<f32>,
        _coordinate_dofs: *const f32,
        _entity_local_index: *const c_int,
        _quadrature_permutation: *const u8,
    ) {
        *a = Complex::new(0.0, 1.0);
    }

    unsafe extern "C" fn stub_c128(
        a: *mut Complex<f64>,
        _w: *const Complex<f64>,
        _c: *const Complex<f64>,
        _coordinate_dofs: *const f64,
        _entity_local_index: *const c_int,
        _quadrature_permutation: *const u8,
    ) {
        *a = Complex::new(0.0, 2.0);
    }

    #[test]
    fn test_kernel_slots_are_pointer_sized() {
        // Null pointer optimization keeps Option<fn> ABI-compatible with a
        // nullable C function pointer.
        assert_eq!(size_of::<Option<TabulateTensorFloat32>>(), size_of::<usize>());
        assert_eq!(size_of::<Option<TabulateTensorFloat64>>(), size_of::<usize>());
        assert_eq!(size_of::<Option<TabulateTensorComplex64>>(), size_of::<usize>());
        assert_eq!(size_of::<Option<TabulateTensorComplex128>>(), size_of::<usize>());
    }

    #[test]
    fn test_stub_kernels_callable_through_typedefs() {
        let f32_kernel: TabulateTensorFloat32 = stub_f32;
        let f64_kernel: TabulateTensorFloat64 = stub_f64;
        let c64_kernel: TabulateTensorComplex64 = stub_c64;
        let c128_kernel: TabulateTensorComplex128 = stub_c128;

        let mut a32 = 0.0f32;
        let mut a64 = 0.0f64;
        let mut ac64 = Complex::new(0.0f32, 0.0);
        let mut ac128 = Complex::new(0.0f64, 0.0);

        unsafe {
            f32_kernel(&mut a32, ptr::null(), ptr::null(), ptr::null(), ptr::null(), ptr::null());
            f64_kernel(&mut a64, ptr::null(), ptr::null(), ptr::null(), ptr::null(), ptr::null());
            c64_kernel(&mut ac64, ptr::null(), ptr::null(), ptr::null(), ptr::null(), ptr::null());
            c128_kernel(&mut ac128, ptr::null(), ptr::null(), ptr::null(), ptr::null(), ptr::null());
        }

        assert_eq!(a32, 1.0);
        assert_eq!(a64, 2.0);
        assert_eq!(ac64, Complex::new(0.0, 1.0));
        assert_eq!(ac128, Complex::new(0.0, 2.0));
    }

    #[test]
    fn test_scalar_trait_selects_matching_slot() {
        let integral = UfcxIntegral {
            enabled_coefficients: ptr::null(),
            tabulate_tensor_float32: Some(stub_f32),
            tabulate_tensor_float64: None,
            tabulate_tensor_complex64: Some(stub_c64),
            tabulate_tensor_complex128: None,
            needs_facet_permutations: false,
            coordinate_element_hash: 0,
        };

        assert!(<f32 as Scalar>::integral_kernel(&integral).is_some());
        assert!(<f64 as Scalar>::integral_kernel(&integral).is_none());
        assert!(<Complex<f32> as Scalar>::integral_kernel(&integral).is_some());
        assert!(<Complex<f64> as Scalar>::integral_kernel(&integral).is_none());
    }
}

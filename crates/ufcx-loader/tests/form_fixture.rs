//! End-to-end checks against an in-memory fixture form
//!
//! Builds the same descriptor data a generated module would export (two
//! cell integrals, one exterior facet integral, stub kernels) and drives
//! the validated views and metadata snapshots over it.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use num_complex::Complex;
use ufcx::{IntegralType, UfcxForm, UfcxIntegral};
use ufcx_loader::{FormMetadata, FormView, LoaderError};

unsafe extern "C" fn scale_by_two_f64(
    a: *mut f64,
    w: *const f64,
    _c: *const f64,
    _coordinate_dofs: *const f64,
    _entity_local_index: *const c_int,
    _quadrature_permutation: *const u8,
) {
    *a = 2.0 * *w;
}

unsafe extern "C" fn rotate_c128(
    a: *mut Complex<f64>,
    w: *const Complex<f64>,
    _c: *const Complex<f64>,
    _coordinate_dofs: *const f64,
    _entity_local_index: *const c_int,
    _quadrature_permutation: *const u8,
) {
    *a = Complex::new(0.0, 1.0) * *w;
}

/// Owns every array a fixture form points into
struct FormFixture {
    _signature: CString,
    _names: Vec<CString>,
    _name_ptrs: (Vec<*const c_char>, Vec<*const c_char>),
    _positions: Vec<c_int>,
    _hashes: Vec<u64>,
    _enabled: Vec<bool>,
    _integrals: Vec<Box<UfcxIntegral>>,
    _integral_ptrs: Vec<*mut UfcxIntegral>,
    _integral_ids: Vec<c_int>,
    _offsets: Vec<c_int>,
    form: UfcxForm,
}

fn make_fixture() -> FormFixture {
    let signature = CString::new("a(u, v; kappa) with facet flux").unwrap();
    let names = vec![CString::new("kappa").unwrap(), CString::new("dt").unwrap()];
    let coefficient_name_ptrs: Vec<*const c_char> = vec![names[0].as_ptr()];
    let constant_name_ptrs: Vec<*const c_char> = vec![names[1].as_ptr()];
    let mut positions: Vec<c_int> = vec![0];
    let mut hashes: Vec<u64> = vec![11, 22, 33];
    let enabled = vec![true];

    let cell = |hash: u64| UfcxIntegral {
        enabled_coefficients: enabled.as_ptr(),
        tabulate_tensor_float32: None,
        tabulate_tensor_float64: Some(scale_by_two_f64),
        tabulate_tensor_complex64: None,
        tabulate_tensor_complex128: Some(rotate_c128),
        needs_facet_permutations: false,
        coordinate_element_hash: hash,
    };
    let facet = UfcxIntegral {
        enabled_coefficients: enabled.as_ptr(),
        tabulate_tensor_float32: None,
        tabulate_tensor_float64: Some(scale_by_two_f64),
        tabulate_tensor_complex64: None,
        tabulate_tensor_complex128: None,
        needs_facet_permutations: true,
        coordinate_element_hash: 99,
    };

    let mut integrals = vec![Box::new(cell(7)), Box::new(cell(7)), Box::new(facet)];
    let mut integral_ptrs: Vec<*mut UfcxIntegral> =
        integrals.iter_mut().map(|integral| ptr::addr_of_mut!(**integral)).collect();
    let mut integral_ids: Vec<c_int> = vec![-1, 4, -1];
    // Two cell integrals, one exterior facet integral, no interior facet
    // integrals.
    let mut offsets: Vec<c_int> = vec![0, 2, 3, 3];

    let form = UfcxForm {
        signature: signature.as_ptr(),
        rank: 2,
        num_coefficients: 1,
        num_constants: 1,
        original_coefficient_positions: positions.as_mut_ptr(),
        coefficient_name_map: coefficient_name_ptrs.as_ptr(),
        constant_name_map: constant_name_ptrs.as_ptr(),
        finite_element_hashes: hashes.as_mut_ptr(),
        form_integrals: integral_ptrs.as_mut_ptr(),
        form_integral_ids: integral_ids.as_mut_ptr(),
        form_integral_offsets: offsets.as_mut_ptr(),
    };

    FormFixture {
        _signature: signature,
        _names: names,
        _name_ptrs: (coefficient_name_ptrs, constant_name_ptrs),
        _positions: positions,
        _hashes: hashes,
        _enabled: enabled,
        _integrals: integrals,
        _integral_ptrs: integral_ptrs,
        _integral_ids: integral_ids,
        _offsets: offsets,
        form,
    }
}

#[test]
fn view_partitions_integrals_by_kind() {
    let fixture = make_fixture();
    let view = FormView::new(&fixture.form).unwrap();

    assert_eq!(view.signature(), "a(u, v; kappa) with facet flux");
    assert_eq!(view.rank(), 2);
    assert_eq!(view.integral_offsets(), [0, 2, 3, 3]);
    assert_eq!(view.total_num_integrals(), 3);
    assert_eq!(view.num_integrals(IntegralType::Cell), 2);
    assert_eq!(view.num_integrals(IntegralType::ExteriorFacet), 1);
    assert_eq!(view.num_integrals(IntegralType::InteriorFacet), 0);

    assert_eq!(view.integral_ids(IntegralType::Cell), &[-1, 4]);
    assert_eq!(view.integral_ids(IntegralType::ExteriorFacet), &[-1]);
    assert!(view.integral_ids(IntegralType::InteriorFacet).is_empty());

    assert_eq!(view.coefficient_names().unwrap(), vec!["kappa"]);
    assert_eq!(view.constant_names().unwrap(), vec!["dt"]);
    assert_eq!(view.original_coefficient_positions(), &[0]);
    assert_eq!(view.finite_element_hashes(), &[11, 22, 33]);
}

#[test]
fn integral_views_expose_flags_and_kernels() {
    let fixture = make_fixture();
    let view = FormView::new(&fixture.form).unwrap();

    let facet = view.integral(IntegralType::ExteriorFacet, 0).unwrap();
    assert!(facet.needs_facet_permutations());
    assert_eq!(facet.coordinate_element_hash(), 99);
    assert_eq!(facet.enabled_coefficients().unwrap(), &[true]);

    let cell = view.integral(IntegralType::Cell, 0).unwrap();
    assert!(cell.kernel::<f32>().is_none());
    assert!(cell.kernel::<Complex<f32>>().is_none());

    let real = cell.kernel::<f64>().unwrap();
    let mut a = 0.0f64;
    let w = 21.0f64;
    unsafe {
        real(&mut a, &w, ptr::null(), ptr::null(), ptr::null(), ptr::null());
    }
    assert_eq!(a, 42.0);

    let complex = cell.kernel::<Complex<f64>>().unwrap();
    let mut a = Complex::new(0.0, 0.0);
    let w = Complex::new(1.0, 0.0);
    unsafe {
        complex(&mut a, &w, ptr::null(), ptr::null(), ptr::null(), ptr::null());
    }
    assert_eq!(a, Complex::new(0.0, 1.0));
}

#[test]
fn integral_lookup_rejects_out_of_range_index() {
    let fixture = make_fixture();
    let view = FormView::new(&fixture.form).unwrap();

    match view.integral(IntegralType::InteriorFacet, 0) {
        Err(LoaderError::IntegralOutOfRange { kind, index, len }) => {
            assert_eq!(kind, "interior_facet");
            assert_eq!(index, 0);
            assert_eq!(len, 0);
        }
        other => panic!("expected IntegralOutOfRange, got {other:?}"),
    }
}

#[test]
fn metadata_snapshot_captures_fixture() {
    let fixture = make_fixture();
    let view = FormView::new(&fixture.form).unwrap();

    let metadata = FormMetadata::capture(&view).unwrap();
    assert_eq!(metadata.signature, "a(u, v; kappa) with facet flux");
    assert_eq!(metadata.integrals.len(), 3);
    assert_eq!(metadata.integrals[0].kind, "cell");
    assert_eq!(metadata.integrals[1].id, 4);
    assert_eq!(metadata.integrals[2].kind, "exterior_facet");
    assert!(metadata.integrals[2].needs_facet_permutations);
    assert!(metadata.integrals[0].kernels.float64);
    assert!(metadata.integrals[0].kernels.complex128);
    assert!(!metadata.integrals[0].kernels.float32);
    assert!(!metadata.integrals[2].kernels.complex128);

    let json = metadata.to_json().unwrap();
    assert!(json.contains("\"kappa\""));
    assert!(json.contains("\"exterior_facet\""));
    assert_eq!(FormMetadata::from_json(&json).unwrap(), metadata);
}

//! Validated views over raw descriptors
//!
//! The raw `#[repr(C)]` descriptors carry lengths in count fields and data
//! behind raw pointers, so every read is unsafe in isolation. A view checks
//! the descriptor's invariants once, up front, and then exposes the data as
//! ordinary slices and strings whose bounds come from the validated counts.
//!
//! Views borrow from the descriptor they wrap. When the descriptor comes
//! out of a loaded module, the borrow is tied to the module handle, so a
//! view can never outlive the library that owns the data.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::slice;

use ufcx::tabulate::TabulateTensor;
use ufcx::{IntegralType, Scalar, UfcxExpression, UfcxForm, UfcxIntegral, NUM_INTEGRAL_TYPES};

use crate::error::{LoaderError, Result};

/// Read a non-negative count field into a usize
fn checked_count(field: &'static str, value: c_int) -> Result<usize> {
    usize::try_from(value).map_err(|_| LoaderError::NegativeCount { field, value })
}

/// Reject null in a field the count fields make mandatory
fn checked_ptr<T>(field: &'static str, ptr: *const T) -> Result<*const T> {
    if ptr.is_null() {
        Err(LoaderError::NullField(field))
    } else {
        Ok(ptr)
    }
}

/// Decode a nul-terminated name list of known length
///
/// # Safety
///
/// `ptr` must point to `len` valid C string pointers that outlive `'a`.
unsafe fn name_list<'a>(field: &'static str, ptr: *const *const c_char, len: usize) -> Result<Vec<&'a str>> {
    let entries = slice::from_raw_parts(ptr, len);
    entries
        .iter()
        .map(|&name| {
            CStr::from_ptr(checked_ptr(field, name)?)
                .to_str()
                .map_err(|source| LoaderError::InvalidString { field, source })
        })
        .collect()
}

/// Validated view over a form descriptor
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    raw: &'a UfcxForm,
    signature: &'a str,
    rank: usize,
    num_coefficients: usize,
    num_constants: usize,
    offsets: [usize; NUM_INTEGRAL_TYPES + 1],
}

impl<'a> FormView<'a> {
    /// Wrap a form descriptor, checking every structural invariant.
    ///
    /// Verifies that the count fields are non-negative, that the integral
    /// offsets start at zero and are non-decreasing, and that every array
    /// the counts make non-empty is backed by a non-null pointer. The name
    /// strings must be valid UTF-8.
    pub fn new(raw: &'a UfcxForm) -> Result<Self> {
        let rank = checked_count("rank", raw.rank)?;
        let num_coefficients = checked_count("num_coefficients", raw.num_coefficients)?;
        let num_constants = checked_count("num_constants", raw.num_constants)?;

        let signature = unsafe { CStr::from_ptr(checked_ptr("signature", raw.signature)?) }
            .to_str()
            .map_err(|source| LoaderError::InvalidString {
                field: "signature",
                source,
            })?;

        let raw_offsets = unsafe {
            slice::from_raw_parts(
                checked_ptr("form_integral_offsets", raw.form_integral_offsets)?,
                NUM_INTEGRAL_TYPES + 1,
            )
        };
        if raw_offsets[0] != 0 {
            return Err(LoaderError::OffsetsBadStart(raw_offsets[0]));
        }
        let mut offsets = [0usize; NUM_INTEGRAL_TYPES + 1];
        for index in 1..raw_offsets.len() {
            if raw_offsets[index] < raw_offsets[index - 1] {
                return Err(LoaderError::OffsetsNotMonotonic {
                    index,
                    previous: raw_offsets[index - 1],
                    value: raw_offsets[index],
                });
            }
            offsets[index] = raw_offsets[index] as usize;
        }

        let num_integrals = offsets[NUM_INTEGRAL_TYPES];
        if num_integrals > 0 {
            checked_ptr("form_integrals", raw.form_integrals)?;
            checked_ptr("form_integral_ids", raw.form_integral_ids)?;
        }
        if num_coefficients > 0 {
            checked_ptr("original_coefficient_positions", raw.original_coefficient_positions)?;
            checked_ptr("coefficient_name_map", raw.coefficient_name_map)?;
        }
        if num_constants > 0 {
            checked_ptr("constant_name_map", raw.constant_name_map)?;
        }
        if rank + num_coefficients > 0 {
            checked_ptr("finite_element_hashes", raw.finite_element_hashes)?;
        }

        Ok(Self {
            raw,
            signature,
            rank,
            num_coefficients,
            num_constants,
            offsets,
        })
    }

    /// Underlying descriptor
    pub fn raw(&self) -> &'a UfcxForm {
        self.raw
    }

    /// String identifying the form
    pub fn signature(&self) -> &'a str {
        self.signature
    }

    /// Rank of the global tensor
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of coefficients
    pub fn num_coefficients(&self) -> usize {
        self.num_coefficients
    }

    /// Number of constants
    pub fn num_constants(&self) -> usize {
        self.num_constants
    }

    /// Original position of each coefficient in the source form
    pub fn original_coefficient_positions(&self) -> &'a [c_int] {
        if self.num_coefficients == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.original_coefficient_positions, self.num_coefficients) }
    }

    /// Coefficient names, in coefficient order
    pub fn coefficient_names(&self) -> Result<Vec<&'a str>> {
        if self.num_coefficients == 0 {
            return Ok(Vec::new());
        }
        unsafe { name_list("coefficient_name_map", self.raw.coefficient_name_map, self.num_coefficients) }
    }

    /// Constant names, in constant order
    pub fn constant_names(&self) -> Result<Vec<&'a str>> {
        if self.num_constants == 0 {
            return Ok(Vec::new());
        }
        unsafe { name_list("constant_name_map", self.raw.constant_name_map, self.num_constants) }
    }

    /// Finite element hashes, one per argument followed by one per
    /// coefficient
    pub fn finite_element_hashes(&self) -> &'a [u64] {
        let len = self.rank + self.num_coefficients;
        if len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.finite_element_hashes, len) }
    }

    /// Offsets partitioning the integral list by kind, with trailing
    /// sentinel
    pub fn integral_offsets(&self) -> [usize; NUM_INTEGRAL_TYPES + 1] {
        self.offsets
    }

    /// Total number of integrals across all kinds
    pub fn total_num_integrals(&self) -> usize {
        self.offsets[NUM_INTEGRAL_TYPES]
    }

    /// Number of integrals of one kind
    pub fn num_integrals(&self, kind: IntegralType) -> usize {
        let kind = kind as usize;
        self.offsets[kind + 1] - self.offsets[kind]
    }

    /// Subdomain IDs of the integrals of one kind
    pub fn integral_ids(&self, kind: IntegralType) -> &'a [c_int] {
        let kind = kind as usize;
        let (begin, end) = (self.offsets[kind], self.offsets[kind + 1]);
        if begin == end {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.form_integral_ids.add(begin), end - begin) }
    }

    /// Integral of one kind at the given position within that kind
    pub fn integral(&self, kind: IntegralType, index: usize) -> Result<IntegralView<'a>> {
        let len = self.num_integrals(kind);
        if index >= len {
            return Err(LoaderError::IntegralOutOfRange {
                kind: kind.name(),
                index,
                len,
            });
        }
        let position = self.offsets[kind as usize] + index;
        let entry = unsafe { *self.raw.form_integrals.add(position) };
        checked_ptr("form_integrals entry", entry)?;
        Ok(IntegralView {
            raw: unsafe { &*entry },
            num_coefficients: self.num_coefficients,
        })
    }

    /// All integrals of one kind
    pub fn integrals(&self, kind: IntegralType) -> Result<Vec<IntegralView<'a>>> {
        (0..self.num_integrals(kind)).map(|index| self.integral(kind, index)).collect()
    }
}

/// Validated view over one integral of a form
#[derive(Debug, Clone, Copy)]
pub struct IntegralView<'a> {
    raw: &'a UfcxIntegral,
    num_coefficients: usize,
}

impl<'a> IntegralView<'a> {
    /// Underlying descriptor
    pub fn raw(&self) -> &'a UfcxIntegral {
        self.raw
    }

    /// Flags marking which of the form's coefficients this integral reads
    pub fn enabled_coefficients(&self) -> Result<&'a [bool]> {
        if self.num_coefficients == 0 {
            return Ok(&[]);
        }
        let ptr = checked_ptr("enabled_coefficients", self.raw.enabled_coefficients)?;
        Ok(unsafe { slice::from_raw_parts(ptr, self.num_coefficients) })
    }

    /// Whether the kernel reads the quadrature permutation argument
    pub fn needs_facet_permutations(&self) -> bool {
        self.raw.needs_facet_permutations
    }

    /// Hash of the coordinate element used for the geometry mapping
    pub fn coordinate_element_hash(&self) -> u64 {
        self.raw.coordinate_element_hash
    }

    /// Kernel variant for the scalar type `S`, if generated
    pub fn kernel<S: Scalar>(&self) -> Option<TabulateTensor<S, S::Real>> {
        S::integral_kernel(self.raw)
    }
}

/// Validated view over an expression descriptor
#[derive(Debug, Clone, Copy)]
pub struct ExpressionView<'a> {
    raw: &'a UfcxExpression,
    num_coefficients: usize,
    num_constants: usize,
    num_points: usize,
    entity_dimension: usize,
    num_components: usize,
    rank: usize,
}

impl<'a> ExpressionView<'a> {
    /// Wrap an expression descriptor, checking its structural invariants
    pub fn new(raw: &'a UfcxExpression) -> Result<Self> {
        let num_coefficients = checked_count("num_coefficients", raw.num_coefficients)?;
        let num_constants = checked_count("num_constants", raw.num_constants)?;
        let num_points = checked_count("num_points", raw.num_points)?;
        let entity_dimension = checked_count("entity_dimension", raw.entity_dimension)?;
        let num_components = checked_count("num_components", raw.num_components)?;
        let rank = checked_count("rank", raw.rank)?;

        if num_coefficients > 0 {
            checked_ptr("original_coefficient_positions", raw.original_coefficient_positions)?;
            checked_ptr("coefficient_names", raw.coefficient_names)?;
        }
        if num_constants > 0 {
            checked_ptr("constant_names", raw.constant_names)?;
        }
        if num_points * entity_dimension > 0 {
            checked_ptr("points", raw.points)?;
        }
        if num_components > 0 {
            checked_ptr("value_shape", raw.value_shape)?;
        }

        Ok(Self {
            raw,
            num_coefficients,
            num_constants,
            num_points,
            entity_dimension,
            num_components,
            rank,
        })
    }

    /// Underlying descriptor
    pub fn raw(&self) -> &'a UfcxExpression {
        self.raw
    }

    /// Number of coefficients
    pub fn num_coefficients(&self) -> usize {
        self.num_coefficients
    }

    /// Number of constants
    pub fn num_constants(&self) -> usize {
        self.num_constants
    }

    /// Number of evaluation points
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Topological dimension of the entity the points live on
    pub fn entity_dimension(&self) -> usize {
        self.entity_dimension
    }

    /// Number of components of the value shape
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Rank, i.e. number of arguments
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Original position of each coefficient in the source expression
    pub fn original_coefficient_positions(&self) -> &'a [c_int] {
        if self.num_coefficients == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.original_coefficient_positions, self.num_coefficients) }
    }

    /// Coefficient names, in coefficient order
    pub fn coefficient_names(&self) -> Result<Vec<&'a str>> {
        if self.num_coefficients == 0 {
            return Ok(Vec::new());
        }
        unsafe { name_list("coefficient_names", self.raw.coefficient_names, self.num_coefficients) }
    }

    /// Constant names, in constant order
    pub fn constant_names(&self) -> Result<Vec<&'a str>> {
        if self.num_constants == 0 {
            return Ok(Vec::new());
        }
        unsafe { name_list("constant_names", self.raw.constant_names, self.num_constants) }
    }

    /// Evaluation point coordinates, flattened `[num_points][entity_dimension]`
    pub fn points(&self) -> &'a [f64] {
        let len = self.num_points * self.entity_dimension;
        if len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.points, len) }
    }

    /// Value shape of the expression
    pub fn value_shape(&self) -> &'a [c_int] {
        if self.num_components == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.value_shape, self.num_components) }
    }

    /// Kernel variant for the scalar type `S`, if generated
    pub fn kernel<S: Scalar>(&self) -> Option<TabulateTensor<S, S::Real>> {
        S::expression_kernel(self.raw)
    }
}

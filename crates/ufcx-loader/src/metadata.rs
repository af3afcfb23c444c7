//! Serializable metadata snapshots of loaded descriptors
//!
//! A snapshot copies everything a tool needs to know about a form or
//! expression out of the raw descriptors into owned, serde-friendly data:
//! names, counts, element hashes, integral IDs per kind, and which of the
//! four kernel variants the module actually generated. Snapshots are for
//! tooling and debugging; assembly code works with the views directly.

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use ufcx::IntegralType;

use crate::error::Result;
use crate::view::{ExpressionView, FormView, IntegralView};

/// Which of the four kernel variants a descriptor carries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KernelAvailability {
    pub float32: bool,
    pub float64: bool,
    pub complex64: bool,
    pub complex128: bool,
}

impl KernelAvailability {
    fn of_integral(integral: &IntegralView<'_>) -> Self {
        Self {
            float32: integral.kernel::<f32>().is_some(),
            float64: integral.kernel::<f64>().is_some(),
            complex64: integral.kernel::<Complex<f32>>().is_some(),
            complex128: integral.kernel::<Complex<f64>>().is_some(),
        }
    }

    fn of_expression(expression: &ExpressionView<'_>) -> Self {
        Self {
            float32: expression.kernel::<f32>().is_some(),
            float64: expression.kernel::<f64>().is_some(),
            complex64: expression.kernel::<Complex<f32>>().is_some(),
            complex128: expression.kernel::<Complex<f64>>().is_some(),
        }
    }
}

/// Snapshot of one integral of a form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntegralMetadata {
    /// Integral kind, as its stable lowercase name
    pub kind: String,
    /// Subdomain ID
    pub id: i32,
    /// Coefficients of the parent form this integral reads
    pub enabled_coefficients: Vec<bool>,
    pub needs_facet_permutations: bool,
    pub coordinate_element_hash: u64,
    pub kernels: KernelAvailability,
}

/// Snapshot of a form descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormMetadata {
    pub signature: String,
    pub rank: usize,
    pub num_coefficients: usize,
    pub num_constants: usize,
    pub coefficient_names: Vec<String>,
    pub constant_names: Vec<String>,
    pub original_coefficient_positions: Vec<i32>,
    pub finite_element_hashes: Vec<u64>,
    /// All integrals, ordered cell, exterior facet, interior facet
    pub integrals: Vec<IntegralMetadata>,
}

impl FormMetadata {
    /// Capture a snapshot from a validated view
    pub fn capture(view: &FormView<'_>) -> Result<Self> {
        let mut integrals = Vec::with_capacity(view.total_num_integrals());
        for kind in IntegralType::ALL {
            let ids = view.integral_ids(kind);
            for (index, integral) in view.integrals(kind)?.into_iter().enumerate() {
                integrals.push(IntegralMetadata {
                    kind: kind.name().to_owned(),
                    id: ids[index],
                    enabled_coefficients: integral.enabled_coefficients()?.to_vec(),
                    needs_facet_permutations: integral.needs_facet_permutations(),
                    coordinate_element_hash: integral.coordinate_element_hash(),
                    kernels: KernelAvailability::of_integral(&integral),
                });
            }
        }

        Ok(Self {
            signature: view.signature().to_owned(),
            rank: view.rank(),
            num_coefficients: view.num_coefficients(),
            num_constants: view.num_constants(),
            coefficient_names: view.coefficient_names()?.into_iter().map(str::to_owned).collect(),
            constant_names: view.constant_names()?.into_iter().map(str::to_owned).collect(),
            original_coefficient_positions: view.original_coefficient_positions().to_vec(),
            finite_element_hashes: view.finite_element_hashes().to_vec(),
            integrals,
        })
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Snapshot of an expression descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpressionMetadata {
    pub num_coefficients: usize,
    pub num_constants: usize,
    pub coefficient_names: Vec<String>,
    pub constant_names: Vec<String>,
    pub original_coefficient_positions: Vec<i32>,
    pub num_points: usize,
    pub entity_dimension: usize,
    /// Evaluation points, flattened `[num_points][entity_dimension]`
    pub points: Vec<f64>,
    pub value_shape: Vec<i32>,
    pub num_components: usize,
    pub rank: usize,
    pub kernels: KernelAvailability,
}

impl ExpressionMetadata {
    /// Capture a snapshot from a validated view
    pub fn capture(view: &ExpressionView<'_>) -> Result<Self> {
        Ok(Self {
            num_coefficients: view.num_coefficients(),
            num_constants: view.num_constants(),
            coefficient_names: view.coefficient_names()?.into_iter().map(str::to_owned).collect(),
            constant_names: view.constant_names()?.into_iter().map(str::to_owned).collect(),
            original_coefficient_positions: view.original_coefficient_positions().to_vec(),
            num_points: view.num_points(),
            entity_dimension: view.entity_dimension(),
            points: view.points().to_vec(),
            value_shape: view.value_shape().to_vec(),
            num_components: view.num_components(),
            rank: view.rank(),
            kernels: KernelAvailability::of_expression(view),
        })
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_metadata_json_roundtrip() {
        let metadata = FormMetadata {
            signature: "a(u, v)".to_owned(),
            rank: 2,
            num_coefficients: 1,
            num_constants: 0,
            coefficient_names: vec!["kappa".to_owned()],
            constant_names: vec![],
            original_coefficient_positions: vec![0],
            finite_element_hashes: vec![1, 2, 3],
            integrals: vec![IntegralMetadata {
                kind: "cell".to_owned(),
                id: -1,
                enabled_coefficients: vec![true],
                needs_facet_permutations: false,
                coordinate_element_hash: 7,
                kernels: KernelAvailability {
                    float64: true,
                    ..KernelAvailability::default()
                },
            }],
        };

        let json = metadata.to_json().unwrap();
        assert_eq!(FormMetadata::from_json(&json).unwrap(), metadata);
    }
}

//! Composite process construction.
//!
//! A composite process is an ordered list of named models sharing one flat
//! hyperparameter vector: each model consumes its own fixed-size slice, in
//! order. Composition is additive superposition of independent processes —
//! covariances sum and basis columns concatenate horizontally.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis, concatenate};

use crate::error::GpError;
use crate::network::NetworkModel;
use crate::station::StationModel;

/// Named models plus the flat hyperparameter vector they consume.
///
/// This is the string-keyed configuration surface: names are resolved
/// against the closed network or station registry when the composite is
/// built.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Ordered model names.
    models: Vec<String>,
    /// Flat hyperparameter vector, concatenated in model order.
    params: Vec<f64>,
}

impl ModelSpec {
    /// Creates a new `ModelSpec`.
    pub fn new(models: impl IntoIterator<Item = impl Into<String>>, params: Vec<f64>) -> Self {
        Self {
            models: models.into_iter().map(Into::into).collect(),
            params,
        }
    }

    /// Returns the ordered model names.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Returns the flat hyperparameter vector.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Returns a copy of this spec with `params` replaced.
    pub fn with_params(&self, params: Vec<f64>) -> Self {
        Self {
            models: self.models.clone(),
            params,
        }
    }
}

/// Checks that every differentiation order is zero.
///
/// Order selection is part of the interface for forward compatibility;
/// every current kernel implements order zero only.
fn check_diff(diff: &[usize]) -> Result<(), GpError> {
    if diff.iter().any(|&o| o != 0) {
        return Err(GpError::UnsupportedDerivative {
            order: diff.to_vec(),
        });
    }
    Ok(())
}

/// Splits `params` into per-model slices of the given widths.
///
/// Fails when the total width disagrees with the vector length.
fn slice_params<'a>(
    names: &[String],
    widths: &[usize],
    params: &'a [f64],
) -> Result<Vec<&'a [f64]>, GpError> {
    let expected: usize = widths.iter().sum();
    if params.len() != expected {
        return Err(GpError::ParameterCount {
            models: names.join(", "),
            expected,
            got: params.len(),
        });
    }

    let mut slices = Vec::with_capacity(widths.len());
    let mut offset = 0;
    for &w in widths {
        slices.push(&params[offset..offset + w]);
        offset += w;
    }
    Ok(slices)
}

/// Additive composite of network models over flattened (t, x0, x1)
/// coordinates.
#[derive(Debug, Clone)]
pub struct NetworkComposite {
    terms: Vec<(NetworkModel, Vec<f64>)>,
}

impl NetworkComposite {
    /// Builds a composite from resolved models and their flat parameter
    /// vector.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::ParameterCount`] when the parameter vector
    /// length does not match the summed model widths.
    pub fn new(models: &[NetworkModel], params: &[f64]) -> Result<Self, GpError> {
        let names: Vec<String> = models.iter().map(|m| m.name().to_string()).collect();
        let widths: Vec<usize> = models.iter().map(|m| m.n_params()).collect();
        let slices = slice_params(&names, &widths, params)?;

        Ok(Self {
            terms: models
                .iter()
                .zip(slices)
                .map(|(&m, s)| (m, s.to_vec()))
                .collect(),
        })
    }

    /// Resolves a [`ModelSpec`] against the network registry.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names and
    /// [`GpError::ParameterCount`] when the parameter vector length does
    /// not match the summed model widths.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self, GpError> {
        let models: Vec<NetworkModel> = spec
            .models()
            .iter()
            .map(|name| NetworkModel::parse(name))
            .collect::<Result<_, _>>()?;
        Self::new(&models, spec.params())
    }

    /// Parses the model names of a spec without consuming parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names.
    pub fn resolve_models(spec: &ModelSpec) -> Result<Vec<NetworkModel>, GpError> {
        spec.models()
            .iter()
            .map(|name| NetworkModel::parse(name))
            .collect()
    }

    /// Returns the total number of basis columns.
    pub fn n_basis(&self) -> usize {
        self.terms.iter().map(|(m, _)| m.n_basis()).sum()
    }

    /// Evaluates the summed covariance between two coordinate sets.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnsupportedDerivative`] for nonzero orders.
    pub fn covariance(
        &self,
        z1: ArrayView2<'_, f64>,
        z2: ArrayView2<'_, f64>,
        diff1: &[usize],
        diff2: &[usize],
    ) -> Result<Array2<f64>, GpError> {
        check_diff(diff1)?;
        check_diff(diff2)?;

        let mut cov = Array2::zeros((z1.nrows(), z2.nrows()));
        for (model, params) in &self.terms {
            cov += &model.covariance(params, z1, z2);
        }
        Ok(cov)
    }

    /// Evaluates the concatenated basis columns at a coordinate set.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnsupportedDerivative`] for nonzero orders.
    pub fn basis(&self, z: ArrayView2<'_, f64>, diff: &[usize]) -> Result<Array2<f64>, GpError> {
        check_diff(diff)?;

        let parts: Vec<Array2<f64>> = self
            .terms
            .iter()
            .map(|(model, params)| model.basis(params, z))
            .collect();
        hstack_basis(z.nrows(), &parts)
    }
}

/// Additive composite of station models over observation times.
#[derive(Debug, Clone)]
pub struct StationComposite {
    terms: Vec<(StationModel, Vec<f64>)>,
}

impl StationComposite {
    /// Builds a composite from resolved models and their flat parameter
    /// vector.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::ParameterCount`] when the parameter vector
    /// length does not match the summed model widths.
    pub fn new(models: &[StationModel], params: &[f64]) -> Result<Self, GpError> {
        let names: Vec<String> = models.iter().map(|m| m.name().to_string()).collect();
        let widths: Vec<usize> = models.iter().map(|m| m.n_params()).collect();
        let slices = slice_params(&names, &widths, params)?;

        Ok(Self {
            terms: models
                .iter()
                .zip(slices)
                .map(|(&m, s)| (m, s.to_vec()))
                .collect(),
        })
    }

    /// Resolves a [`ModelSpec`] against the station registry.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names and
    /// [`GpError::ParameterCount`] when the parameter vector length does
    /// not match the summed model widths.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self, GpError> {
        let models: Vec<StationModel> = spec
            .models()
            .iter()
            .map(|name| StationModel::parse(name))
            .collect::<Result<_, _>>()?;
        Self::new(&models, spec.params())
    }

    /// Parses the model names of a spec without consuming parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names.
    pub fn resolve_models(spec: &ModelSpec) -> Result<Vec<StationModel>, GpError> {
        spec.models()
            .iter()
            .map(|name| StationModel::parse(name))
            .collect()
    }

    /// Returns the number of basis columns contributed per station.
    pub fn n_basis(&self) -> usize {
        self.terms.iter().map(|(m, _)| m.n_basis()).sum()
    }

    /// Evaluates the summed temporal covariance between two epoch sets.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnsupportedDerivative`] for nonzero orders.
    pub fn covariance(
        &self,
        t1: ArrayView1<'_, f64>,
        t2: ArrayView1<'_, f64>,
        diff1: &[usize],
        diff2: &[usize],
    ) -> Result<Array2<f64>, GpError> {
        check_diff(diff1)?;
        check_diff(diff2)?;

        let mut cov = Array2::zeros((t1.len(), t2.len()));
        for (model, params) in &self.terms {
            cov += &model.covariance(params, t1, t2);
        }
        Ok(cov)
    }

    /// Evaluates the concatenated basis columns at an epoch set.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnsupportedDerivative`] for nonzero orders.
    pub fn basis(&self, t: ArrayView1<'_, f64>, diff: &[usize]) -> Result<Array2<f64>, GpError> {
        check_diff(diff)?;

        let parts: Vec<Array2<f64>> = self
            .terms
            .iter()
            .map(|(model, params)| model.basis(params, t))
            .collect();
        hstack_basis(t.len(), &parts)
    }
}

/// Horizontally concatenates basis blocks, tolerating empty blocks and
/// the all-empty case (a `(n_rows, 0)` result).
pub fn hstack_basis(n_rows: usize, parts: &[Array2<f64>]) -> Result<Array2<f64>, GpError> {
    let views: Vec<_> = parts
        .iter()
        .filter(|p| p.ncols() > 0)
        .map(|p| p.view())
        .collect();
    if views.is_empty() {
        return Ok(Array2::zeros((n_rows, 0)));
    }
    concatenate(Axis(1), &views).map_err(|err| GpError::ShapeMismatch {
        details: format!("basis concatenation failed: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn network_from_spec_single() {
        let spec = ModelSpec::new(["se-se"], vec![1.0, 2.0, 3.0]);
        let gp = NetworkComposite::from_spec(&spec).unwrap();
        assert_eq!(gp.n_basis(), 0);
    }

    #[test]
    fn network_unknown_model() {
        let spec = ModelSpec::new(["se-matern"], vec![1.0]);
        let err = NetworkComposite::from_spec(&spec).unwrap_err();
        assert!(matches!(err, GpError::UnknownModel { .. }));
    }

    #[test]
    fn network_parameter_count_mismatch() {
        let spec = ModelSpec::new(["se-se", "exp-se"], vec![1.0, 2.0, 3.0]);
        let err = NetworkComposite::from_spec(&spec).unwrap_err();
        match err {
            GpError::ParameterCount {
                models,
                expected,
                got,
            } => {
                assert_eq!(models, "se-se, exp-se");
                assert_eq!(expected, 6);
                assert_eq!(got, 3);
            }
            other => panic!("expected GpError::ParameterCount, got {other:?}"),
        }
    }

    #[test]
    fn network_additive_covariance() {
        let z = array![[0.0, 0.0, 0.0], [1.0, 0.5, 0.5]];
        let a = NetworkComposite::from_spec(&ModelSpec::new(["se-se"], vec![1.0, 1.0, 1.0]))
            .unwrap()
            .covariance(z.view(), z.view(), &[0, 0, 0], &[0, 0, 0])
            .unwrap();
        let b = NetworkComposite::from_spec(&ModelSpec::new(["exp-se"], vec![0.5, 2.0, 1.0]))
            .unwrap()
            .covariance(z.view(), z.view(), &[0, 0, 0], &[0, 0, 0])
            .unwrap();
        let both = NetworkComposite::from_spec(&ModelSpec::new(
            ["se-se", "exp-se"],
            vec![1.0, 1.0, 1.0, 0.5, 2.0, 1.0],
        ))
        .unwrap()
        .covariance(z.view(), z.view(), &[0, 0, 0], &[0, 0, 0])
        .unwrap();

        for i in 0..2 {
            for j in 0..2 {
                assert!(
                    (both[[i, j]] - a[[i, j]] - b[[i, j]]).abs() < 1e-12,
                    "additivity violated at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn network_rejects_nonzero_diff() {
        let z = array![[0.0, 0.0, 0.0]];
        let gp =
            NetworkComposite::from_spec(&ModelSpec::new(["se-se"], vec![1.0, 1.0, 1.0])).unwrap();
        let err = gp
            .covariance(z.view(), z.view(), &[1, 0, 0], &[0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, GpError::UnsupportedDerivative { .. }));
        let err = gp.basis(z.view(), &[0, 1, 0]).unwrap_err();
        assert!(matches!(err, GpError::UnsupportedDerivative { .. }));
    }

    #[test]
    fn station_composite_concatenates_basis() {
        let t = array![0.0, 1.0, 2.0];
        let spec = ModelSpec::new(["fogm", "p1", "per"], vec![1.0, 5.0]);
        let gp = StationComposite::from_spec(&spec).unwrap();
        assert_eq!(gp.n_basis(), 6);

        let p = gp.basis(t.view(), &[0]).unwrap();
        assert_eq!(p.dim(), (3, 6));
        // First p1 column is the constant offset.
        assert_eq!(p.column(0).to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn station_composite_sums_kernels() {
        let t = array![0.0, 1.0];
        let spec = ModelSpec::new(["wn", "fogm"], vec![2.0, 1.0, 3.0]);
        let gp = StationComposite::from_spec(&spec).unwrap();
        let cov = gp.covariance(t.view(), t.view(), &[0], &[0]).unwrap();

        // Diagonal: wn variance + fogm variance.
        assert!((cov[[0, 0]] - (4.0 + 1.0)).abs() < 1e-12);
        // Off-diagonal: fogm only.
        assert!((cov[[0, 1]] - (-1.0_f64 / 3.0).exp()).abs() < 1e-12);
    }

    #[test]
    fn station_empty_params_for_basis_only() {
        let spec = ModelSpec::new(["p0", "per"], vec![]);
        let gp = StationComposite::from_spec(&spec).unwrap();
        assert_eq!(gp.n_basis(), 5);
    }

    #[test]
    fn model_spec_with_params() {
        let spec = ModelSpec::new(["wn"], vec![1.0]);
        let replaced = spec.with_params(vec![2.0]);
        assert_eq!(replaced.models(), spec.models());
        assert_eq!(replaced.params(), &[2.0]);
    }
}

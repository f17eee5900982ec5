//! VSA Primitives: bind and bundle under three algebras.
//!
//! - **HRR** (Holographic Reduced Representations): bind is circular
//!   convolution, computed as a product in the Fourier domain.
//! - **MAP** (Multiply-Add-Permute): bind is elementwise multiplication.
//! - **VTB** (Vector-derived Transformation Binding): bind reshapes one
//!   operand into a block-diagonal matrix and applies it to the other.
//!
//! All three bundle by elementwise addition. The method is chosen once, when
//! the [`Operator`] is built, and every call afterwards is a plain `match`.

use crate::error::{GraphVsaError, Result};
use crate::vector::Vector;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The binding algebra used by an [`Operator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum VsaMethod {
    /// Circular convolution binding
    Hrr,
    /// Elementwise multiplication binding
    Map,
    /// Vector-derived transformation binding
    Vtb,
}

impl VsaMethod {
    /// Lowercase name used in signatures and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            VsaMethod::Hrr => "hrr",
            VsaMethod::Map => "map",
            VsaMethod::Vtb => "vtb",
        }
    }

    /// Whether `bind(a, b) == bind(b, a)` holds for this algebra.
    pub fn is_commutative(&self) -> bool {
        !matches!(self, VsaMethod::Vtb)
    }
}

impl fmt::Display for VsaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VsaMethod {
    type Err = GraphVsaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hrr" => Ok(VsaMethod::Hrr),
            "map" => Ok(VsaMethod::Map),
            "vtb" => Ok(VsaMethod::Vtb),
            _ => Err(GraphVsaError::UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for VsaMethod {
    type Error = GraphVsaError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[derive(Clone)]
enum Kernel {
    Hrr {
        forward: Arc<dyn Fft<f64>>,
        inverse: Arc<dyn Fft<f64>>,
    },
    Map,
    Vtb {
        /// Side of the square block, `sqrt(dimensions)`
        block: usize,
    },
}

/// A bind/bundle operator for vectors of one fixed dimensionality.
///
/// Building an operator plans the FFTs (HRR) or checks the block shape (VTB)
/// up front, so `bind` and `bundle` are total for inputs of the configured
/// length. The operator is immutable and cheap to clone.
#[derive(Clone)]
pub struct Operator {
    method: VsaMethod,
    dimensions: usize,
    kernel: Kernel,
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("method", &self.method)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl Operator {
    /// Build an operator for `dimensions`-long vectors.
    ///
    /// Fails if `dimensions` is zero, or for VTB when it is not a perfect
    /// square.
    pub fn new(method: VsaMethod, dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(GraphVsaError::InvalidConfig(
                "dimensions must be positive".to_string(),
            ));
        }

        let kernel = match method {
            VsaMethod::Hrr => {
                let mut planner = FftPlanner::new();
                Kernel::Hrr {
                    forward: planner.plan_fft_forward(dimensions),
                    inverse: planner.plan_fft_inverse(dimensions),
                }
            }
            VsaMethod::Map => Kernel::Map,
            VsaMethod::Vtb => {
                let block = (dimensions as f64).sqrt().round() as usize;
                if block * block != dimensions {
                    return Err(GraphVsaError::InvalidConfig(format!(
                        "vtb needs a square dimensionality, got {}",
                        dimensions
                    )));
                }
                Kernel::Vtb { block }
            }
        };

        Ok(Self {
            method,
            dimensions,
            kernel,
        })
    }

    /// The binding algebra.
    pub fn method(&self) -> VsaMethod {
        self.method
    }

    /// The vector length this operator was planned for.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Bind two vectors.
    ///
    /// The result is dissimilar to both inputs, but
    /// `unbind(bind(a, b), b) ≈ a`. Under VTB the second operand supplies the
    /// transformation, so the operation does not commute.
    pub fn bind(&self, a: &Vector, b: &Vector) -> Vector {
        self.check(a, b, "bind");

        match &self.kernel {
            Kernel::Hrr { forward, inverse } => {
                Self::convolve(forward.as_ref(), inverse.as_ref(), a, b, false)
            }
            Kernel::Map => Vector::from_data(
                a.data()
                    .iter()
                    .zip(b.data().iter())
                    .map(|(&x, &y)| x * y)
                    .collect(),
            ),
            Kernel::Vtb { block } => Self::transform(*block, a, b, false),
        }
    }

    /// Approximate inverse of [`bind`](Self::bind) with respect to `key`.
    ///
    /// HRR uses circular correlation, MAP rebinds, VTB applies the transposed
    /// transformation.
    pub fn unbind(&self, bound: &Vector, key: &Vector) -> Vector {
        self.check(bound, key, "unbind");

        match &self.kernel {
            Kernel::Hrr { forward, inverse } => {
                Self::convolve(forward.as_ref(), inverse.as_ref(), bound, key, true)
            }
            Kernel::Map => self.bind(bound, key),
            Kernel::Vtb { block } => Self::transform(*block, bound, key, true),
        }
    }

    /// Bundle two vectors (elementwise addition).
    pub fn bundle(&self, a: &Vector, b: &Vector) -> Vector {
        let mut out = a.clone();
        self.bundle_into(&mut out, b);
        out
    }

    /// Bundle `other` into `acc` in place.
    ///
    /// Produces exactly the same values as `bundle(acc, other)`.
    pub fn bundle_into(&self, acc: &mut Vector, other: &Vector) {
        self.check(acc, other, "bundle");
        acc.add_assign(other);
    }

    fn check(&self, a: &Vector, b: &Vector, op: &str) {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in {}",
            op
        );
        assert_eq!(
            a.dimensions(),
            self.dimensions,
            "Operator planned for {} dimensions in {}",
            self.dimensions,
            op
        );
    }

    /// Circular convolution (or correlation when `correlate`) via FFT.
    fn convolve(
        forward: &dyn Fft<f64>,
        inverse: &dyn Fft<f64>,
        a: &Vector,
        b: &Vector,
        correlate: bool,
    ) -> Vector {
        let n = a.dimensions();
        let mut fa: Vec<Complex<f64>> = a.data().iter().map(|&x| Complex::new(x, 0.0)).collect();
        let mut fb: Vec<Complex<f64>> = b.data().iter().map(|&x| Complex::new(x, 0.0)).collect();

        forward.process(&mut fa);
        forward.process(&mut fb);

        for (x, y) in fa.iter_mut().zip(fb.iter()) {
            *x *= if correlate { y.conj() } else { *y };
        }

        inverse.process(&mut fa);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / n as f64;
        Vector::from_data(fa.iter().map(|c| c.re * scale).collect())
    }

    /// Apply `I ⊗ (√m · reshape(key, m × m))` to `x`, or its transpose.
    fn transform(block: usize, x: &Vector, key: &Vector, transpose: bool) -> Vector {
        let scale = (block as f64).sqrt();
        let k = key.data();
        let xs = x.data();
        let mut out = vec![0.0; xs.len()];

        for (chunk_in, chunk_out) in xs.chunks(block).zip(out.chunks_mut(block)) {
            for (r, slot) in chunk_out.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (c, &xv) in chunk_in.iter().enumerate() {
                    let kv = if transpose {
                        k[c * block + r]
                    } else {
                        k[r * block + c]
                    };
                    acc += kv * xv;
                }
                *slot = scale * acc;
            }
        }

        Vector::from_data(out)
    }
}

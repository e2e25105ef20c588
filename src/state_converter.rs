//! # StateConverter: configured conversion engine
//!
//! [`StateConverter`] is the façade that ties together the settings a host
//! application chooses once and reuses for many conversions:
//!
//! 1. **Central body** ([`CentralBody`]) – gravitational parameter, equatorial
//!    radius and flattening.
//! 2. **Anomaly flavour** ([`AnomalyType`]) – content of the anomaly slot of
//!    Keplerian and ModifiedKeplerian states.
//! 3. **Diagnostics sink** ([`Diagnostics`]) – warn-once flags, shared behind an
//!    [`Arc`] so several converters (or threads) can rate-limit advisories together.
//!
//! The handle is immutable once built and can be shared across threads.
//!
//! ## Typical usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use orbconv::central_body::CentralBody;
//! use orbconv::constants::State6;
//! use orbconv::diagnostics::Diagnostics;
//! use orbconv::state_converter::StateConverter;
//! use orbconv::state_type::{AnomalyType, StateType};
//!
//! let diagnostics = Arc::new(Diagnostics::new());
//! let converter = StateConverter::new(CentralBody::earth())
//!     .with_anomaly_type(AnomalyType::Mean)
//!     .with_diagnostics(Arc::clone(&diagnostics));
//!
//! let cart = State6::new(7000.0, 0.0, 0.0, 0.0, 7.546, 0.0);
//! let kep = converter.convert(&cart, StateType::Cartesian, StateType::Keplerian).unwrap();
//! assert!(kep[1] < 1e-3);
//! assert!(diagnostics.warned().is_empty());
//! ```
//!
//! ## See also
//! ------------
//! * [`convert`] – Underlying dispatch router.
//! * [`crate::jacobian`] – Partial derivatives between representations.

use std::sync::Arc;

use crate::central_body::CentralBody;
use crate::constants::{Jacobian6, State6};
use crate::conversion::{convert, convert_by_name, ConversionContext};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::Diagnostics;
use crate::jacobian::{state_conv_jacobian, JacobianStrategy};
use crate::kepler::convert_anomaly;
use crate::state_type::{AnomalyType, StateType};

#[derive(Debug, Clone)]
pub struct StateConverter {
    body: CentralBody,
    anomaly_type: AnomalyType,
    diagnostics: Arc<Diagnostics>,
}

impl StateConverter {
    /// Construct a converter about `body`, with true anomalies and a fresh
    /// diagnostics sink.
    pub fn new(body: CentralBody) -> Self {
        StateConverter {
            body,
            anomaly_type: AnomalyType::True,
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// Use `anomaly_type` for the anomaly slot of Keplerian-family states.
    pub fn with_anomaly_type(mut self, anomaly_type: AnomalyType) -> Self {
        self.anomaly_type = anomaly_type;
        self
    }

    /// Report advisories on `diagnostics` instead of the converter's own sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn body(&self) -> &CentralBody {
        &self.body
    }

    pub fn anomaly_type(&self) -> AnomalyType {
        self.anomaly_type
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Borrowed settings for one call of the free conversion functions.
    pub fn context(&self) -> ConversionContext<'_> {
        ConversionContext::new(&self.body, self.anomaly_type, &self.diagnostics)
    }

    /// Convert `state` between two representations.
    ///
    /// See also
    /// --------
    /// * [`convert`] – Routing rules and errors.
    pub fn convert(&self, state: &State6, from: StateType, to: StateType) -> Result<State6, ConversionError> {
        convert(state, from, to, &self.context())
    }

    /// Convert `state` between two representations named by their script names.
    pub fn convert_by_name(&self, state: &State6, from: &str, to: &str) -> Result<State6, ConversionError> {
        convert_by_name(state, from, to, &self.context())
    }

    /// Convert an anomaly (radians) for eccentricity `ecc`.
    pub fn convert_anomaly(
        &self,
        from: AnomalyType,
        to: AnomalyType,
        value: f64,
        ecc: f64,
    ) -> Result<f64, ConversionError> {
        convert_anomaly(from, to, value, ecc, &self.diagnostics)
    }

    /// Partial derivatives `∂(jac_out)/∂(jac_in)` at `state`, given in `from`.
    ///
    /// See also
    /// --------
    /// * [`state_conv_jacobian`] – Strategy selection and errors.
    pub fn jacobian(
        &self,
        state: &State6,
        from: StateType,
        jac_in: StateType,
        jac_out: StateType,
        strategy: Option<JacobianStrategy>,
    ) -> Result<Jacobian6, ConversionError> {
        state_conv_jacobian(state, from, jac_in, jac_out, strategy, &self.context())
    }
}

#[cfg(test)]
mod state_converter_test {
    use super::*;
    use crate::diagnostics::Advisory;

    #[test]
    fn test_shared_diagnostics() {
        let diag = Arc::new(Diagnostics::new());
        let first = StateConverter::new(CentralBody::earth()).with_diagnostics(Arc::clone(&diag));
        let second = StateConverter::new(CentralBody::earth()).with_diagnostics(Arc::clone(&diag));

        let negative_ecc = State6::new(8000.0, -0.1, 30.0, 0.0, 0.0, 0.0);
        first
            .convert(&negative_ecc, StateType::Keplerian, StateType::Cartesian)
            .unwrap();
        assert!(second.diagnostics().has_warned(Advisory::NegativeEccentricity));
    }

    #[test]
    fn test_builder_defaults() {
        let converter = StateConverter::new(CentralBody::from_name("Mars").unwrap());
        assert_eq!(converter.anomaly_type(), AnomalyType::True);
        assert_eq!(converter.body().name, "Mars");
        let converter = converter.with_anomaly_type(AnomalyType::Eccentric);
        assert_eq!(converter.context().anomaly_type, AnomalyType::Eccentric);
    }
}

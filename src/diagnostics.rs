//! # Advisory diagnostics
//!
//! Some conversions silently normalize their input (a negative eccentricity is
//! flipped, the sign of the semi-major axis is made consistent with the
//! eccentricity, …) or return an approximate answer (Brouwer-Lyddane refinement
//! that stops before converging). These situations are not errors, but the user
//! must be told about them, once.
//!
//! A [`Diagnostics`] sink is owned by the caller and handed to the converters.
//! It holds one atomic flag per [`Advisory`] category: the first time a category
//! fires, the message is emitted through the [`log`] facade at `warn` level and
//! the flag is set; further occurrences are dropped. The test-and-set is a
//! single atomic `swap`, so a sink can be shared between threads (usually behind
//! an [`std::sync::Arc`]).
//!
//! ```rust
//! use orbconv::diagnostics::{Advisory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! assert!(diagnostics.warn_once(Advisory::CriticalInclination, "close to 63.4 deg"));
//! assert!(!diagnostics.warn_once(Advisory::CriticalInclination, "close to 63.4 deg"));
//! assert!(diagnostics.has_warned(Advisory::CriticalInclination));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

/// Category of a rate-limited advisory message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// Negative eccentricity, sign flipped.
    NegativeEccentricity,
    /// Semi-major axis sign inconsistent with the eccentricity, sign flipped.
    SemiMajorAxisSign,
    /// Hyperbolic state evaluated close to its asymptote.
    LargeOrbitalRadius,
    /// Mean anomaly requested for a near parabolic orbit.
    NearParabolicAnomaly,
    ApsidesForIncomingAsymptote,
    ApsidesForOutgoingAsymptote,
    BrouwerNotConvergingShort,
    BrouwerNotConvergingLong,
    BrouwerSmallEccentricity,
    CriticalInclination,
    PossibleInaccuracyShort,
    PossibleInaccuracyLong,
    InaccuracyCriticalAngle,
}

impl Advisory {
    pub const ALL: [Advisory; 13] = [
        Advisory::NegativeEccentricity,
        Advisory::SemiMajorAxisSign,
        Advisory::LargeOrbitalRadius,
        Advisory::NearParabolicAnomaly,
        Advisory::ApsidesForIncomingAsymptote,
        Advisory::ApsidesForOutgoingAsymptote,
        Advisory::BrouwerNotConvergingShort,
        Advisory::BrouwerNotConvergingLong,
        Advisory::BrouwerSmallEccentricity,
        Advisory::CriticalInclination,
        Advisory::PossibleInaccuracyShort,
        Advisory::PossibleInaccuracyLong,
        Advisory::InaccuracyCriticalAngle,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Caller-owned, thread-safe set of "already warned" flags.
#[derive(Debug, Default)]
pub struct Diagnostics {
    flags: [AtomicBool; Advisory::ALL.len()],
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `message` as a warning unless `category` already fired on this sink.
    ///
    /// Return
    /// ------
    /// * `true` if this call emitted the message, `false` if it was suppressed.
    pub fn warn_once(&self, category: Advisory, message: &str) -> bool {
        let already = self.flags[category.index()].swap(true, Ordering::AcqRel);
        if !already {
            log::warn!("{message}");
        }
        !already
    }

    /// Whether `category` has fired on this sink.
    pub fn has_warned(&self, category: Advisory) -> bool {
        self.flags[category.index()].load(Ordering::Acquire)
    }

    /// Categories that have fired so far, in declaration order.
    pub fn warned(&self) -> Vec<Advisory> {
        Advisory::ALL
            .into_iter()
            .filter(|a| self.has_warned(*a))
            .collect()
    }

    /// Re-arm every category.
    pub fn reset(&self) {
        for flag in &self.flags {
            flag.store(false, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod diagnostics_test {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_warn_once_per_category() {
        let diag = Diagnostics::new();
        assert!(diag.warned().is_empty());

        assert!(diag.warn_once(Advisory::NegativeEccentricity, "first"));
        assert!(!diag.warn_once(Advisory::NegativeEccentricity, "second"));
        assert!(diag.warn_once(Advisory::SemiMajorAxisSign, "other category"));

        assert_eq!(
            diag.warned(),
            vec![Advisory::NegativeEccentricity, Advisory::SemiMajorAxisSign]
        );

        diag.reset();
        assert!(!diag.has_warned(Advisory::NegativeEccentricity));
        assert!(diag.warn_once(Advisory::NegativeEccentricity, "again"));
    }

    #[test]
    fn test_single_emission_across_threads() {
        let diag = Arc::new(Diagnostics::new());
        let emitted: usize = (0..8)
            .map(|_| {
                let d = Arc::clone(&diag);
                thread::spawn(move || d.warn_once(Advisory::CriticalInclination, "race") as usize)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .sum();
        assert_eq!(emitted, 1);
    }
}

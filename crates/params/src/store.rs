//! The parameter-sample store.

use std::collections::HashMap;

use crate::error::ParamError;
use crate::schedule::TimeSchedule;
use crate::value::ParamValue;

/// A registry of named parameter values indexed by sample, stratum, and
/// time interval.
///
/// The store is constructed against fixed `(n_samples, n_strata)` bounds
/// and a [`TimeSchedule`]; registration validates dimensions eagerly so
/// that lookups never fail for shape reasons. Once populated, the store is
/// read-only for the duration of a simulation run and is shared across
/// workers by reference.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    n_samples: usize,
    n_strata: usize,
    schedule: TimeSchedule,
    // One binding per interval, or a single binding constant across intervals.
    entries: HashMap<String, Vec<ParamValue>>,
}

impl ParameterSet {
    /// Creates an empty store with the given bounds and schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidSchedule`] if either bound is zero.
    pub fn new(
        n_samples: usize,
        n_strata: usize,
        schedule: TimeSchedule,
    ) -> Result<Self, ParamError> {
        if n_samples == 0 || n_strata == 0 {
            return Err(ParamError::InvalidSchedule {
                reason: format!(
                    "store bounds must be positive, got {n_samples} samples x {n_strata} strata"
                ),
            });
        }
        Ok(Self {
            n_samples,
            n_strata,
            schedule,
            entries: HashMap::new(),
        })
    }

    /// Returns the number of parameter-sample draws.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Returns the number of population strata.
    pub fn n_strata(&self) -> usize {
        self.n_strata
    }

    /// Returns the time schedule the store resolves lookups against.
    pub fn schedule(&self) -> &TimeSchedule {
        &self.schedule
    }

    /// Returns true if `name` has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registers a value constant across all time intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::DuplicateParameter`] if `name` is taken, or
    /// [`ParamError::DimensionMismatch`] if the value's dimensions disagree
    /// with the store bounds.
    pub fn register(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        self.register_time_varying(name, vec![value])
    }

    /// Registers one value per time interval.
    ///
    /// A single-element `values` is treated as constant across intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::DuplicateParameter`] if `name` is taken,
    /// [`ParamError::DimensionMismatch`] if the binding count is neither 1
    /// nor the schedule's interval count or any value's dimensions disagree
    /// with the store bounds.
    pub fn register_time_varying(
        &mut self,
        name: &str,
        values: Vec<ParamValue>,
    ) -> Result<(), ParamError> {
        if self.entries.contains_key(name) {
            return Err(ParamError::DuplicateParameter {
                name: name.to_string(),
            });
        }
        let n_intervals = self.schedule.n_intervals();
        if values.len() != 1 && values.len() != n_intervals {
            return Err(ParamError::DimensionMismatch {
                name: name.to_string(),
                expected: n_intervals,
                got: values.len(),
            });
        }
        for value in &values {
            self.check_shape(name, value)?;
        }
        self.entries.insert(name.to_string(), values);
        Ok(())
    }

    fn check_shape(&self, name: &str, value: &ParamValue) -> Result<(), ParamError> {
        match value {
            ParamValue::Scalar(_) => Ok(()),
            ParamValue::PerStratum(v) => {
                if v.len() != self.n_strata {
                    return Err(ParamError::DimensionMismatch {
                        name: name.to_string(),
                        expected: self.n_strata,
                        got: v.len(),
                    });
                }
                Ok(())
            }
            ParamValue::Draws {
                n_samples,
                n_strata,
                ..
            } => {
                if *n_samples != self.n_samples {
                    return Err(ParamError::DimensionMismatch {
                        name: name.to_string(),
                        expected: self.n_samples,
                        got: *n_samples,
                    });
                }
                if *n_strata != self.n_strata {
                    return Err(ParamError::DimensionMismatch {
                        name: name.to_string(),
                        expected: self.n_strata,
                        got: *n_strata,
                    });
                }
                Ok(())
            }
        }
    }

    /// Retrieves a parameter value for a (sample, stratum, interval) triple.
    ///
    /// Scalar parameters broadcast: they are returned unchanged regardless
    /// of the requested indices.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::UnknownParameter`] if `name` was never
    /// registered, or [`ParamError::IndexOutOfRange`] if any index exceeds
    /// the configured bounds.
    pub fn get(
        &self,
        name: &str,
        sample: usize,
        stratum: usize,
        interval: usize,
    ) -> Result<f64, ParamError> {
        let bindings = self
            .entries
            .get(name)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: name.to_string(),
            })?;
        if sample >= self.n_samples {
            return Err(ParamError::IndexOutOfRange {
                axis: "sample",
                index: sample,
                bound: self.n_samples,
            });
        }
        if stratum >= self.n_strata {
            return Err(ParamError::IndexOutOfRange {
                axis: "stratum",
                index: stratum,
                bound: self.n_strata,
            });
        }
        if interval >= self.schedule.n_intervals() {
            return Err(ParamError::IndexOutOfRange {
                axis: "interval",
                index: interval,
                bound: self.schedule.n_intervals(),
            });
        }
        // Single-binding entries are constant across intervals.
        let value = if bindings.len() == 1 {
            &bindings[0]
        } else {
            &bindings[interval]
        };
        Ok(value.at(sample, stratum))
    }

    /// Retrieves a parameter value at an evaluation time, resolving the
    /// time interval through the schedule first.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NoApplicableInterval`] if `time` precedes the
    /// first boundary, plus everything [`ParameterSet::get`] can return.
    pub fn lookup_at(
        &self,
        name: &str,
        sample: usize,
        stratum: usize,
        time: f64,
    ) -> Result<f64, ParamError> {
        let interval = self.schedule.interval_at(time)?;
        self.get(name, sample, stratum, interval)
    }
}

//! Bounded retry with graceful degradation.
//!
//! Several generation steps retry a random process until a condition holds
//! (a connected backbone, a removable cluster of the right size). None of
//! them may loop forever, and running out of attempts is an expected result:
//! the last attempt is kept and reported as degraded instead of failing.

/// Result of a generation step that may have fallen back to a best effort.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, W> {
    /// The value satisfies every requested property.
    Success(T),
    /// The value is usable but some properties could not be met.
    Degraded(T, Vec<W>),
}

impl<T, W> Outcome<T, W> {
    /// Returns true if at least one warning was recorded
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(..))
    }

    /// Borrow the produced value
    pub fn value(&self) -> &T {
        match self {
            Self::Success(value) | Self::Degraded(value, _) => value,
        }
    }

    /// Warnings recorded while producing the value
    pub fn warnings(&self) -> &[W] {
        match self {
            Self::Success(_) => &[],
            Self::Degraded(_, warnings) => warnings,
        }
    }

    /// Split into the value and its warnings
    pub fn into_parts(self) -> (T, Vec<W>) {
        match self {
            Self::Success(value) => (value, Vec::new()),
            Self::Degraded(value, warnings) => (value, warnings),
        }
    }

    /// Map the value, keeping the warnings
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, W> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Degraded(value, warnings) => Outcome::Degraded(f(value), warnings),
        }
    }

    /// Append a warning, turning a success into a degraded outcome
    pub fn with_warning(self, warning: W) -> Self {
        let (value, mut warnings) = self.into_parts();
        warnings.push(warning);
        Self::Degraded(value, warnings)
    }

    /// Append a warning if one is given
    pub fn with_optional_warning(self, warning: Option<W>) -> Self {
        match warning {
            Some(warning) => self.with_warning(warning),
            None => self,
        }
    }
}

/// Calls `attempt` until `accept` approves the produced value or `max_attempts`
/// calls have been made. At least one attempt is always made.
///
/// If no attempt is accepted, the last value is returned as
/// [`Outcome::Degraded`] with the warning built by `on_exhausted` from the
/// number of attempts made.
pub fn retry_bounded<T, W>(
    max_attempts: usize,
    mut attempt: impl FnMut() -> T,
    accept: impl Fn(&T) -> bool,
    on_exhausted: impl FnOnce(usize) -> W,
) -> Outcome<T, W> {
    let max_attempts = max_attempts.max(1);
    let mut value = attempt();
    let mut attempts = 1;

    while !accept(&value) {
        if attempts >= max_attempts {
            return Outcome::Degraded(value, vec![on_exhausted(attempts)]);
        }
        value = attempt();
        attempts += 1;
    }

    Outcome::Success(value)
}

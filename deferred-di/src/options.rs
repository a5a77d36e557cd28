/// What [`crate::OptionalAsync`] does with an instance that cannot be narrowed
/// to the requested type.
///
/// [`crate::LazyAsync`] and [`crate::ProviderAsync`] have no empty state and
/// always report [`crate::InjectionError::TypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Treat the instance as if nothing was produced
    #[default]
    Absent,
    /// Fail the construction with [`crate::InjectionError::TypeMismatch`]
    Fail,
}

/// The settled result of a promise: either the promise was kept and carries a
/// value, or it was broken and carries an error.
///
/// An `Outcome` is what a [`Future`](crate::Future) hands to every reader once
/// it is resolved. Timeouts are not outcomes; they belong to a single wait call
/// and are reported as [`TimeoutError`](crate::TimeoutError) instead.
///
/// # Examples
///
/// ```
/// use promise_future::Outcome;
///
/// let outcome: Outcome<u32, String> = "42".parse::<u32>().map_err(|e| e.to_string()).into();
/// assert_eq!(outcome.kept(), Some(&42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T, E> {
    Kept(T),
    Broken(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_kept(&self) -> bool {
        matches!(self, Outcome::Kept(_))
    }

    pub fn is_broken(&self) -> bool {
        matches!(self, Outcome::Broken(_))
    }

    pub fn kept(&self) -> Option<&T> {
        match self {
            Outcome::Kept(value) => Some(value),
            Outcome::Broken(_) => None,
        }
    }

    pub fn broken(&self) -> Option<&E> {
        match self {
            Outcome::Kept(_) => None,
            Outcome::Broken(err) => Some(err),
        }
    }

    pub fn into_kept(self) -> Option<T> {
        match self {
            Outcome::Kept(value) => Some(value),
            Outcome::Broken(_) => None,
        }
    }

    pub fn into_broken(self) -> Option<E> {
        match self {
            Outcome::Kept(_) => None,
            Outcome::Broken(err) => Some(err),
        }
    }

    /// Borrows the payload as a `Result`, so `?` can be used on a shared outcome.
    pub fn as_result(&self) -> Result<&T, &E> {
        match self {
            Outcome::Kept(value) => Ok(value),
            Outcome::Broken(err) => Err(err),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Kept(value) => Ok(value),
            Outcome::Broken(err) => Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Kept(value),
            Err(err) => Outcome::Broken(err),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::Outcome;

    #[test]
    fn test_kept_carries_only_value() {
        let outcome: Outcome<i32, String> = Outcome::Kept(5);
        assert!(outcome.is_kept());
        assert!(!outcome.is_broken());
        assert_eq!(outcome.kept(), Some(&5));
        assert_eq!(outcome.broken(), None);
        assert_eq!(outcome.as_result(), Ok(&5));
        assert_eq!(outcome.into_kept(), Some(5));
    }

    #[test]
    fn test_broken_carries_only_error() {
        let outcome: Outcome<i32, String> = Outcome::Broken("💥".into());
        assert!(outcome.is_broken());
        assert_eq!(outcome.kept(), None);
        assert_eq!(outcome.broken().map(String::as_str), Some("💥"));
        assert_eq!(outcome.clone().into_kept(), None);
        assert_eq!(outcome.into_result(), Err("💥".to_string()));
    }

    #[test]
    fn test_from_result() {
        let ok: Outcome<&str, ()> = Ok("🍓").into();
        assert_eq!(ok, Outcome::Kept("🍓"));
        let err: Outcome<(), &str> = Err("reject!!").into();
        assert_eq!(err.into_broken(), Some("reject!!"));
        let back: Result<u8, ()> = Outcome::Kept(1).into();
        assert_eq!(back, Ok(1));
    }
}

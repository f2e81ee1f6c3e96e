//! Operations: zero-argument units of work submitted to the executor.

use std::fmt::{self, Write as _};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Produced value, rendered only when the line actually needs it.
pub(crate) type Produced<'a> = Option<Box<dyn fmt::Display + 'a>>;

type Thunk<'a> = Box<dyn FnOnce() -> Result<Produced<'a>, String> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Returns a value that may be printed as `[Return: ...]`
    Value,
    /// Runs for its side effects only
    Effect,
}

/// A boxed closure plus what kind of result it yields.
///
/// An operation fails when it returns `Err` or panics. Either way the
/// executor reports the message and moves on to the next operation.
/// Rendering a produced value counts as part of the operation: a `Display`
/// impl that errors or panics fails it the same way.
///
/// Captured panics still pass through the process panic hook first, so with
/// the default hook each one also prints `thread '...' panicked at ...` to
/// stderr next to the `[Error message: ...]` line. Install a quieter hook
/// with [`std::panic::set_hook`] if that output is unwanted.
pub struct Operation<'a> {
    kind: OperationKind,
    thunk: Thunk<'a>,
}

impl<'a> Operation<'a> {
    /// Value-producing operation that cannot return an error.
    pub fn value<T, F>(f: F) -> Self
    where
        F: FnOnce() -> T + 'a,
        T: fmt::Display + 'a,
    {
        Self {
            kind: OperationKind::Value,
            thunk: Box::new(move || -> Result<Produced<'a>, String> {
                Ok(Some(Box::new(f()) as Box<dyn fmt::Display + 'a>))
            }),
        }
    }

    /// Value-producing operation whose `Err` is reported as a failure.
    pub fn try_value<T, E, F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + 'a,
        T: fmt::Display + 'a,
        E: fmt::Display,
    {
        Self {
            kind: OperationKind::Value,
            thunk: Box::new(move || -> Result<Produced<'a>, String> {
                match f() {
                    Ok(v) => Ok(Some(Box::new(v) as Box<dyn fmt::Display + 'a>)),
                    Err(e) => Err(e.to_string()),
                }
            }),
        }
    }

    /// Side-effect-only operation.
    pub fn effect<F>(f: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        Self {
            kind: OperationKind::Effect,
            thunk: Box::new(move || -> Result<Produced<'a>, String> {
                f();
                Ok(None)
            }),
        }
    }

    /// Side-effect-only operation whose `Err` is reported as a failure.
    pub fn try_effect<E, F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + 'a,
        E: fmt::Display,
    {
        Self {
            kind: OperationKind::Effect,
            thunk: Box::new(move || -> Result<Produced<'a>, String> {
                f().map(|()| None).map_err(|e| e.to_string())
            }),
        }
    }

    /// Whether the operation produces a value; recorded on the executor's
    /// per-operation tracing events.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Run the closure, turning a panic into an error message.
    pub(crate) fn invoke(self) -> Result<Produced<'a>, String> {
        match catch_unwind(AssertUnwindSafe(self.thunk)) {
            Ok(outcome) => outcome,
            Err(panic) => Err(panic_message(panic.as_ref())),
        }
    }
}

/// Render a produced value, turning a formatting error or panic into an
/// error message.
pub(crate) fn render(value: &dyn fmt::Display) -> Result<String, String> {
    let mut buf = String::new();
    match catch_unwind(AssertUnwindSafe(|| write!(buf, "{value}"))) {
        Ok(Ok(())) => Ok(buf),
        Ok(Err(fmt::Error)) => Err("Failed to format return value".to_string()),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

impl fmt::Debug for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(op: Operation<'_>) -> Result<Option<String>, String> {
        match op.invoke()? {
            Some(v) => render(v.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    struct Unprintable;

    impl fmt::Display for Unprintable {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    struct PanicsOnDisplay;

    impl fmt::Display for PanicsOnDisplay {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("display exploded")
        }
    }

    #[test]
    fn test_value_renders_display() {
        let op = Operation::value(|| 42);
        assert_eq!(op.kind(), OperationKind::Value);
        assert_eq!(rendered(op), Ok(Some("42".to_string())));
    }

    #[test]
    fn test_effect_has_no_value() {
        let mut ran = false;
        let op = Operation::effect(|| ran = true);
        assert_eq!(op.kind(), OperationKind::Effect);
        assert_eq!(rendered(op), Ok(None));
        assert!(ran);
    }

    #[test]
    fn test_err_becomes_message() {
        let op = Operation::try_value(|| "x".parse::<i32>());
        assert_eq!(rendered(op), Err("invalid digit found in string".to_string()));

        let op = Operation::try_effect(|| Err::<(), _>("disk full"));
        assert_eq!(rendered(op), Err("disk full".to_string()));
    }

    #[test]
    fn test_panic_is_captured() {
        let op = Operation::effect(|| panic!("boom"));
        assert_eq!(rendered(op), Err("boom".to_string()));

        let code = 7;
        let op = Operation::value(move || -> i32 { panic!("bad code {code}") });
        assert_eq!(rendered(op), Err("bad code 7".to_string()));

        let op = Operation::effect(|| std::panic::panic_any(3_u8));
        assert_eq!(rendered(op), Err("Unknown panic".to_string()));
    }

    #[test]
    fn test_borrows_caller_state() {
        let items = vec![1, 2, 3];
        let op = Operation::value(|| items.iter().sum::<i32>());
        assert_eq!(rendered(op), Ok(Some("6".to_string())));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_render_failures_become_messages() {
        assert_eq!(
            rendered(Operation::value(|| Unprintable)),
            Err("Failed to format return value".to_string())
        );
        assert_eq!(
            rendered(Operation::value(|| PanicsOnDisplay)),
            Err("display exploded".to_string())
        );
    }
}

use std::fmt::Display;

use tracing::error;

/// Log the error before handing the result over to the host
pub trait Logged {
    fn log(self) -> Self;
}

impl<T: Sized, E: Display> Logged for Result<T, E> {
    fn log(self) -> Self {
        if let Err(e) = &self {
            error!("{}", e);
        }
        self
    }
}

/// Run a side-effect with the value as the receiver, then pass it on.
/// Mostly used to emit a log line once a setup step has produced its result.
pub trait Appliable
where
    Self: Sized,
{
    fn then<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }
}

impl<T> Appliable for T where T: Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_then_passes_value_through() {
        let mut seen = 0;
        let v = 42.then(|x| seen = *x);
        assert_eq!(v, 42);
        assert_eq!(seen, 42);
    }

    #[test]
    fn test_log_keeps_result() {
        let r: Result<i32, String> = Err("boom".to_string());
        assert_eq!(r.log(), Err("boom".to_string()));
        let r: Result<i32, String> = Ok(1);
        assert_eq!(r.log(), Ok(1));
    }
}

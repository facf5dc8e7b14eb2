/// Returns early with an error.
///
/// `raise!(kind)` converts the kind into the function's error type, so it
/// works both for helpers returning `Result<_, ErrorKind>` and for callers
/// returning `Result<_, EvalError>`. `raise!(kind, column)` attaches the
/// 1-based column of the offending character.
#[macro_export]
macro_rules! raise {
    ($kind:expr) => {
        return ::std::result::Result::Err(::std::convert::From::from($kind))
    };
    ($kind:expr, $column:expr) => {
        return ::std::result::Result::Err(::std::convert::From::from(
            $crate::eval::EvalError::at($kind, $column),
        ))
    };
}

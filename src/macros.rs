/// Build an argument array from plain values, converting each with `SqlArg::from`.
///
/// ```rust
/// use sql_template::prelude::*;
///
/// let args = sql_args!["Xiaomi Updated", 11699.0, 2];
/// assert_eq!(args.len(), 3);
/// let none = sql_args![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! sql_args {
    () => {{
        let args: [$crate::SqlArg; 0] = [];
        args
    }};
    ($($arg:expr),+ $(,)?) => {
        [$($crate::SqlArg::from($arg)),+]
    };
}

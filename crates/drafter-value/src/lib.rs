//! drafter-value - the value graph drafted by `drafter`.
//!
//! Containers are reference counted, so cloning a [`Value`] is cheap and two
//! values can share any amount of substructure. The engine relies on this:
//! an untouched subtree of a base value reappears in the next state as the
//! very same allocation.
//!
//! # Example
//!
//! ```
//! use drafter_value::{same, value, Value};
//!
//! let base = value!({"foo": {"bar": "str"}, "arr": []});
//! let copy = base.clone();
//! assert!(same(&base, &copy));
//! assert_eq!(copy, value!({"arr": [], "foo": {"bar": "str"}}));
//! ```

pub mod clone;
pub mod equal;
pub mod error;
pub mod json;
pub mod path;
pub mod shared;
pub mod value;

pub use clone::deep_clone;
pub use equal::{deep_equal, same};
pub use error::ValueError;
pub use path::{escape_component, format_pointer, Path, PathStep};
pub use shared::SharedValue;
pub use value::{Record, Value, ValueKind};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Build a [`Value`] from JSON syntax.
///
/// Expands to `Value::from(serde_json::json!(...))`: objects become records,
/// arrays become sequences and integral numbers become [`Value::Int`].
#[macro_export]
macro_rules! value {
    ($($json:tt)+) => {
        $crate::Value::from($crate::__serde_json::json!($($json)+))
    };
}

//! Primitives for flowcell
//!
//! - [`AsyncLocal`]: a variable whose value belongs to the logical call chain
//! - [`AsyncLocalBuilder`] / [`CellConfig`]: construction and configuration
//! - [`async_local!`]: declare a process-wide cell as a `static`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod async_local;
pub mod builder;

pub use async_local::AsyncLocal;
pub use builder::{AsyncLocalBuilder, CellConfig};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

/// Declare a `static` async-local cell
///
/// The initializer is the cell's default factory: it is evaluated lazily,
/// at most once per chain that never set the value.
///
/// ```
/// use flowcell_primitives::async_local;
///
/// async_local!(static LOCALE: String = String::from("en_US"););
///
/// assert_eq!(LOCALE.get(), "en_US");
/// LOCALE.set("de_DE".into());
/// assert_eq!(LOCALE.get(), "de_DE");
/// ```
#[macro_export]
macro_rules! async_local {
    ($(#[$attr:meta])* $vis:vis static $name:ident : $ty:ty = $init:expr;) => {
        $(#[$attr])*
        $vis static $name: $crate::__private::Lazy<$crate::AsyncLocal<$ty>> =
            $crate::__private::Lazy::new(|| {
                $crate::AsyncLocal::builder()
                    .name(stringify!($name))
                    .release_on_drop(false)
                    .factory(|| -> $ty { $init })
            });
    };
}

//! Macros for ergonomic state machine construction.

/// Generate a state identifier enum with a `StateId` implementation.
///
/// An `Empty` variant is appended for the built-in empty state, so it must
/// not be listed. The generated enum derives `Clone`, `Copy`, `PartialEq`,
/// `Eq`, `Hash`, `Debug` and serde's `Serialize`/`Deserialize`; the calling
/// crate needs `serde` as a dependency.
///
/// # Example
///
/// ```
/// use statehop::core::StateId;
/// use statehop::state_enum;
///
/// state_enum! {
///     pub enum GameState {
///         Menu,
///         Playing,
///         Paused,
///     }
/// }
///
/// assert_eq!(GameState::Paused.name(), "Paused");
/// assert_eq!(GameState::empty(), GameState::Empty);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Empty,
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                    Self::Empty => "Empty",
                }
            }

            fn empty() -> Self {
                Self::Empty
            }
        }
    };
}

//! Public API: the [`PanelDitherer`] builder and the unified [`DitherError`].

mod builder;
mod error;

pub use builder::PanelDitherer;
pub(crate) use error::try_alloc;
pub use error::DitherError;

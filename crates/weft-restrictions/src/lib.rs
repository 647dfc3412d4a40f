//! Restriction flags and directive normalization for weft documents.
//!
//! A [`RestrictionSet`] holds the safety and behavior switches a formatter
//! consults while turning Textile markup into output text. Callers configure it
//! with [`Directive`]s: bare flags (`"filter_html"`) or keyed options
//! (`{disable_inline: "image"}`).
//!
//! Option names are resolved against the closed [`Restriction`] enumeration.
//! An unknown name is a hard error.
//!
//! # Example
//!
//! ```
//! use weft_restrictions::{Directive, RestrictionSet};
//!
//! let set = RestrictionSet::from_directives([
//!     Directive::flag("filter_html"),
//!     Directive::keyed([("disable_inline", "image".into())]),
//! ])
//! .unwrap();
//!
//! assert!(set.filter_html());
//! assert_eq!(set.disable_inline(), ["image"]);
//!
//! let err = RestrictionSet::from_directives([Directive::flag("not_a_real_flag")]).unwrap_err();
//! assert_eq!(err.name, "not_a_real_flag");
//! ```

mod directive;
mod error;
mod restriction;
mod set;

pub use directive::Directive;
pub use error::UnknownRestrictionError;
pub use restriction::{Restriction, RestrictionValue, TagNames};
pub use set::RestrictionSet;

//! Domain types shared by the web layer.
//!
//! Nothing in this crate knows about HTTP: the web crate depends on the domain,
//! never the other way around. Members, items, value conversions and item
//! validation live here so they can be exercised without a server.

pub mod convert;
pub mod item;
pub mod member;
pub mod validation;

pub use convert::{format_grouped, parse_grouped, ConversionError, IpPort};
pub use item::{Item, ItemSaveForm};
pub use member::Member;
pub use validation::{BindingResult, FieldError, ItemValidator, ObjectError, RejectedValue};

//! Navigation resolution for the folio site
//!
//! The site can be served from three kinds of places: a project page on a
//! static host (e.g. `*.github.io`), an ordinary absolute-path host, or a
//! plain `file://` checkout. Links in the navigation menu have to work in
//! all three, so the menu is derived from the current location every time
//! it is rendered: compute a site-root prefix, prefix every link with it,
//! and mark the link matching the current page as active.
//!
//! Everything in this crate is pure. There is no cached state; callers
//! resolve a fresh [`NavMenu`] from a [`Location`] whenever they need one.

pub mod location;
pub mod menu;

pub use location::{Location, Protocol};
pub use menu::{NavLink, NavMenu, Page};

//! # dstok-check
//!
//! **Tier 2 (Static Collision Detector)**
//!
//! Three independent checkers over already-emitted artifacts and hand-written
//! build configuration. They run after generation because some collision
//! classes only manifest in rendered output (hand-edited overrides) or only
//! exist in config files (ports, bundler directives).
//!
//! Each checker is a pure function: text/config in, findings out. There is no
//! shared state between them, so a driver may run all three in parallel and
//! join on the aggregator.
//!
//! * [`css::check_stylesheet`]: custom properties and class selectors
//!   outside the required namespace, line-addressed.
//! * [`ports::check_ports`]: documentation-server port assignments, covering
//!   mismatches, duplicate claims, and stray cross-reference URLs.
//! * [`bundler::check_bundler`]: native-bundler deduplication directives and
//!   workspace package scope.

pub mod bundler;
pub mod css;
pub mod ports;

pub use bundler::{ManifestFile, check_bundler};
pub use css::check_stylesheet;
pub use ports::{PortEntry, check_ports};

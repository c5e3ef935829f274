//! Route declaration and flattening subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTree (nested, declaration-ordered)
//!     → classify.rs (bare handler vs route config vs handler config)
//!     → flatten.rs (depth-first walk, path.rs joins segments)
//!     → Vec<ParsedRoute> (one record per declared path/method pair)
//! ```
//!
//! # Design Decisions
//! - Shapes are variant tags, not runtime probing
//! - Path order is declaration order; method order within a node is fixed
//! - Flattening is pure: same tree, same output, input untouched
//! - No failure modes: degenerate input gives degenerate output

pub mod classify;
pub mod flatten;
pub mod method;
pub mod options;
pub mod path;
pub mod tree;

pub use flatten::{parse_routes, parse_routes_with_base, ParsedRoute};
pub use method::{HttpMethod, RouteMethod, ALL_HTTP_METHOD, HTTP_METHODS};
pub use options::HandlerOptions;
pub use path::join_paths;
pub use tree::{RouteConfig, RouteHandler, RouteNode, RouteTree};

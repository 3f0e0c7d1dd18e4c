//! Property search and lead capture core.
//!
//! Everything in this module is a pure function over immutable values: the
//! loaded catalog is never mutated, every filter change recomputes the visible
//! subset from scratch, and the selection is an explicit state machine. The
//! HTTP layer and the tests drive the same code paths.

pub mod facets;
pub mod filter;
pub mod selection;
pub mod workflow;

pub use facets::CityFacets;
pub use filter::FilterState;
pub use selection::Selection;
pub use workflow::{LeadCapture, LeadCaptureError, LeadForm, LeadSink};

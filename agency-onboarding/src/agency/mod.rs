//! Agency input handling.
//!
//! An onboarding run is driven by one [`AgencyInput`], supplied either on the
//! command line or through the `inputs` of a `workflow_dispatch` event.

mod error;
mod input;

pub use error::AgencyError;
pub use input::AgencyInput;

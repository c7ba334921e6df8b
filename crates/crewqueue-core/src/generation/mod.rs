//! Generation - seeded creation of demo crew rosters.

mod crew;
mod names;

pub use crew::*;
pub use names::*;

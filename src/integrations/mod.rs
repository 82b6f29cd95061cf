//! External collaborators.

pub mod model {
    pub use crate::model::*;
}

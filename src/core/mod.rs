// Domain-layer modules and shared errors/models
pub mod schema {
    pub use crate::schema::*;
}

pub mod features {
    pub use crate::features::*;
}

pub mod encoder {
    pub use crate::encoder::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod services {
    pub use crate::services::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}

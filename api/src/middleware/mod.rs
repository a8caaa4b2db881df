pub mod cors;
pub mod gate;

pub use cors::create_cors;
pub use gate::{parse_authorization, BearerGate};

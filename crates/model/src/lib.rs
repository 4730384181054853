pub use serde_with;

pub mod geocode;
pub mod geometry;
pub mod primitive;
pub mod route;
pub mod zone;

/// Representative instance of a type, served next to its JSON schema.
pub trait ExampleData {
    fn example_data() -> Self;
}

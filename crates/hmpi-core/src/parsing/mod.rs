pub mod normalize;
pub mod values;

pub use normalize::normalize_metal;
pub use values::parse_concentration;

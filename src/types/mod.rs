pub mod analysis;
pub mod plan;
pub mod resource;
pub mod use_case;

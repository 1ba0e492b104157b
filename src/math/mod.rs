pub mod mat2x3;
pub mod rect;
pub mod vec2;

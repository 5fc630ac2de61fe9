pub mod hit;
pub mod paint;

pub use hit::{Hit, hit_test};
pub use paint::paint_board;

//! 대시보드 전반에서 사용되는 공통 타입.

mod asset;
mod parameter_set;
mod period;
mod price_row;

pub use asset::*;
pub use parameter_set::*;
pub use period::*;
pub use price_row::*;

//! 리스/구매 비교에 쓰이는 재무 계산 모듈 모음.

pub mod amortization;
pub mod depreciation;
pub mod lease;
pub mod mileage;

pub use amortization::*;
pub use depreciation::*;
pub use lease::*;
pub use mileage::*;

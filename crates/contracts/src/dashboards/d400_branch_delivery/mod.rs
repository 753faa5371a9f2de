pub mod dto;

pub use dto::{
    BranchDeliveryResponse, BranchTotalRow, StageBreakdownQuery, StageBreakdownResponse,
    StageBreakdownRow, SuccessRateRow,
};

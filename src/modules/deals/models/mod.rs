mod deal;

pub use deal::{
    CreateDealRequest, Deal, DealResponse, DealStage, MoveStageRequest, UpdateDealRequest,
};

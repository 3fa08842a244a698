use super::entities::{CareerApplication, CareerJob};
use serde::Serialize;
use ts_rs::TS;

// 职位列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct JobListResponse {
    pub items: Vec<CareerJob>,
}

// 职位申请列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct ApplicationListResponse {
    pub job: CareerJob,
    pub items: Vec<CareerApplication>,
}

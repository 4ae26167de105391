//! 同步状态处理函数

use axum::{extract::State, Json};

use shared::models::SyncStatus;

use crate::core::AppState;

/// 当前 epoch 与各主题版本号快照
pub async fn status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status())
}

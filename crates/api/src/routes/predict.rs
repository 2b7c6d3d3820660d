//! Prediction Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::AisRecord;
use inference_engine::PredictionResult;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::telemetry;
use crate::AppState;

/// Score one AIS record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AisRecord>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(record) = payload.map_err(|rejection| {
        let err = ApiError::from(rejection);
        telemetry::record_error(err.kind());
        err
    })?;

    let detector = state.detector().ok_or_else(|| {
        telemetry::record_error(ApiError::NotReady.kind());
        ApiError::NotReady
    })?;

    let start = Instant::now();
    match detector.predict(&record) {
        Ok(result) => {
            telemetry::record_prediction(result.status.as_str(), start.elapsed());
            Ok(Json(result))
        }
        Err(err) => {
            let err = ApiError::from(err);
            telemetry::record_error(err.kind());
            Err(err)
        }
    }
}

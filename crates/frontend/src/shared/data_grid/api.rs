use super::error::GridError;
use crate::shared::api_utils::api_url;
use contracts::shared::data_grid::{GridFetchRequest, GridResponse};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// POST the grid request and decode the envelope.
///
/// A non-2xx reply that still carries `{error: true, message}` is returned as
/// an envelope so the backend's message reaches the user.
pub async fn fetch_grid<R: DeserializeOwned>(
    endpoint: &str,
    request: &GridFetchRequest,
) -> Result<GridResponse<R>, GridError> {
    let response = Request::post(&api_url(endpoint))
        .header("Accept", "application/json")
        .json(request)
        .map_err(|e| GridError::Encode(e.to_string()))?
        .send()
        .await
        .map_err(|e| GridError::Transport(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        if let Ok(envelope) = response.json::<GridResponse<R>>().await {
            if envelope.error {
                return Ok(envelope);
            }
        }
        return Err(GridError::Status(status));
    }

    response
        .json::<GridResponse<R>>()
        .await
        .map_err(|e| GridError::Decode(e.to_string()))
}

// keep in sync with the Node-RED flow endpoints
use anyhow::{bail, Result};
use futures::{pin_mut, select, FutureExt};
use gloo_timers::future::TimeoutFuture;
use log::warn;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::model::{
    AddDeviceRequest, CreateZoneRequest, Credentials, Device, DeviceCatalogItem, IrrigationSchedule,
    IrrigationZone, LoginResponse, RegisterResponse, UpdateScheduleRequest, ValveAction,
    ValveActionRequest,
};
use crate::session;

/// Calls give up after this long and surface like any other network failure.
const REQUEST_TIMEOUT_MS: u32 = 10_000;

fn host_url() -> String {
    let location = web_sys::window().unwrap().location();
    // Node-RED answers on its default port
    format!(
        "{}//{}:1880",
        location.protocol().unwrap(),
        location.hostname().unwrap()
    )
}

fn api_url(endpoint: &str) -> String {
    format!("{}/{endpoint}", host_url())
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Prefer the backend's own `message` field, if it sent one.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// Attaches the bearer token when one is stored, bounds the call with the
/// request timeout and normalizes failures to a displayable message. A 401
/// additionally drops the stored token so the next protected action forces
/// re-authentication; the caller still just sees the failure.
async fn execute(request: RequestBuilder) -> Result<Response> {
    let store = session::browser();
    let request = match store.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    };

    let send = request.header(ACCEPT, "application/json").send().fuse();
    let deadline = TimeoutFuture::new(REQUEST_TIMEOUT_MS).fuse();
    pin_mut!(send, deadline);
    let response = select! {
        res = send => res?,
        _ = deadline => bail!("request timed out"),
    };

    if response.status() == StatusCode::UNAUTHORIZED {
        warn!("401 from backend, dropping stored token");
        store.evict_token();
    }
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!(error_message(status, &body));
    }
    Ok(response)
}

pub async fn login(credentials: &Credentials) -> Result<LoginResponse> {
    let client = reqwest::Client::new();
    let resp = execute(client.post(api_url("auth/login")).json(credentials)).await?;
    Ok(resp.json().await?)
}

pub async fn register(credentials: &Credentials) -> Result<RegisterResponse> {
    let client = reqwest::Client::new();
    let resp = execute(client.post(api_url("auth/register")).json(credentials)).await?;
    Ok(resp.json().await?)
}

pub async fn devices() -> Result<Vec<Device>> {
    let client = reqwest::Client::new();
    let resp = execute(client.get(api_url("api/devices"))).await?;
    Ok(resp.json().await?)
}

pub async fn add_device(device: &AddDeviceRequest) -> Result<Device> {
    let client = reqwest::Client::new();
    let resp = execute(client.post(api_url("api/devices")).json(device)).await?;
    Ok(resp.json().await?)
}

pub async fn remove_device(deveui: &str) -> Result<()> {
    let client = reqwest::Client::new();
    execute(client.delete(api_url(&format!("api/devices/{deveui}")))).await?;
    Ok(())
}

pub async fn device_catalog() -> Result<Vec<DeviceCatalogItem>> {
    let client = reqwest::Client::new();
    let resp = execute(client.get(api_url("api/catalog"))).await?;
    Ok(resp.json().await?)
}

pub async fn control_valve(deveui: &str, action: ValveAction) -> Result<()> {
    let client = reqwest::Client::new();
    execute(
        client
            .post(api_url(&format!("api/valve/{deveui}")))
            .json(&ValveActionRequest { action }),
    )
    .await?;
    Ok(())
}

pub async fn zones() -> Result<Vec<IrrigationZone>> {
    let client = reqwest::Client::new();
    let resp = execute(client.get(api_url("api/irrigation-zones"))).await?;
    Ok(resp.json().await?)
}

pub async fn create_zone(name: &str) -> Result<IrrigationZone> {
    let client = reqwest::Client::new();
    let resp = execute(
        client
            .post(api_url("api/irrigation-zones"))
            .json(&CreateZoneRequest {
                name: name.to_owned(),
            }),
    )
    .await?;
    Ok(resp.json().await?)
}

pub async fn delete_zone(id: i64) -> Result<()> {
    let client = reqwest::Client::new();
    execute(client.delete(api_url(&format!("api/irrigation-zones/{id}")))).await?;
    Ok(())
}

pub async fn assign_device(zone_id: i64, deveui: &str) -> Result<()> {
    let client = reqwest::Client::new();
    execute(client.put(api_url(&format!(
        "api/irrigation-zones/{zone_id}/devices/{deveui}"
    ))))
    .await?;
    Ok(())
}

pub async fn unassign_device(zone_id: i64, deveui: &str) -> Result<()> {
    let client = reqwest::Client::new();
    execute(client.delete(api_url(&format!(
        "api/irrigation-zones/{zone_id}/devices/{deveui}"
    ))))
    .await?;
    Ok(())
}

pub async fn update_schedule(
    zone_id: i64,
    schedule: &UpdateScheduleRequest,
) -> Result<IrrigationSchedule> {
    let client = reqwest::Client::new();
    let resp = execute(
        client
            .put(api_url(&format!("api/irrigation-zones/{zone_id}/schedule")))
            .json(schedule),
    )
    .await?;
    Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        let msg = error_message(
            StatusCode::CONFLICT,
            r#"{"message":"device already registered"}"#,
        );
        assert_eq!(msg, "device already registered");
    }

    #[test]
    fn missing_message_falls_back_to_status() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(msg, "request failed with status 500 Internal Server Error");

        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error":"nope"}"#);
        assert_eq!(msg, "request failed with status 404 Not Found");
    }
}

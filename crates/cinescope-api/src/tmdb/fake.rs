//! Scripted `LocalTmdbApi` double shared by the service and aggregation tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::api::LocalTmdbApi;
use super::error::UpstreamError;
use super::params::QueryParams;

/// Canned response for one endpoint.
#[derive(Debug, Clone)]
enum Scripted {
    Ok(Value),
    Status(u16),
}

/// Answers by endpoint and records every call.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    responses: HashMap<String, Scripted>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `endpoint` with `body`.
    pub(crate) fn ok(mut self, endpoint: &str, body: Value) -> Self {
        self.responses
            .insert(String::from(endpoint), Scripted::Ok(body));
        self
    }

    /// Answers `endpoint` with an HTTP error status.
    pub(crate) fn fail(mut self, endpoint: &str, status: u16) -> Self {
        self.responses
            .insert(String::from(endpoint), Scripted::Status(status));
        self
    }

    /// Delays the answer for `endpoint`.
    pub(crate) fn delay(mut self, endpoint: &str, by: Duration) -> Self {
        self.delays.insert(String::from(endpoint), by);
        self
    }

    /// Number of requests issued so far.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().map_or(0, |calls| calls.len())
    }

    /// Endpoints requested so far, in call order.
    pub(crate) fn endpoints(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(e, _)| e.clone()).collect())
            .unwrap_or_default()
    }

    /// Parameters of the last request to `endpoint`.
    pub(crate) fn last_params(&self, endpoint: &str) -> Option<QueryParams> {
        self.calls.lock().ok().and_then(|calls| {
            calls
                .iter()
                .rev()
                .find(|(e, _)| e == endpoint)
                .map(|(_, p)| p.clone())
        })
    }
}

impl LocalTmdbApi for FakeApi {
    async fn request(&self, endpoint: &str, params: &QueryParams) -> Result<Value, UpstreamError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((String::from(endpoint), params.clone()));
        }
        if let Some(delay) = self.delays.get(endpoint) {
            tokio::time::sleep(*delay).await;
        }
        match self.responses.get(endpoint) {
            Some(Scripted::Ok(body)) => Ok(body.clone()),
            Some(Scripted::Status(status)) => Err(UpstreamError::Status {
                endpoint: String::from(endpoint),
                status: *status,
                message: String::from("scripted failure"),
            }),
            None => Err(UpstreamError::Status {
                endpoint: String::from(endpoint),
                status: 404,
                message: String::from("not scripted"),
            }),
        }
    }
}

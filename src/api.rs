//! Thin wrappers over the backend endpoints the CLI uses

use serde::Serialize;
use serde_json::Value;

use crate::cli::{RecordKind, SearchKind};
use crate::client::{ApiClient, ApiRequest};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AskRequest {
    pub(crate) question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) phone: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

pub(crate) fn ask(client: &ApiClient<'_>, request: &AskRequest) -> Result<Value, AppError> {
    Ok(client.send(ApiRequest::post("/qa/ask").json(request)?)?)
}

pub(crate) fn question_history(
    client: &ApiClient<'_>,
    page: u32,
    size: u32,
) -> Result<Value, AppError> {
    Ok(client.send(
        ApiRequest::get("/qa/history")
            .query("page", page)
            .query("size", size),
    )?)
}

pub(crate) fn search(
    client: &ApiClient<'_>,
    kind: SearchKind,
    keyword: &str,
    page: u32,
    size: u32,
) -> Result<Value, AppError> {
    let resource = match kind {
        SearchKind::Articles => "article",
        SearchKind::Cases => "case",
        SearchKind::Concepts => "concept",
    };
    Ok(client.send(
        ApiRequest::get(format!("/legal/{resource}/search"))
            .query("keyword", keyword)
            .query("page", page)
            .query("size", size),
    )?)
}

pub(crate) fn update_profile(
    client: &ApiClient<'_>,
    update: &ProfileUpdate,
) -> Result<Value, AppError> {
    Ok(client.send(ApiRequest::put("/auth/profile").json(update)?)?)
}

pub(crate) fn admin_stats(client: &ApiClient<'_>) -> Result<Value, AppError> {
    Ok(client.send(ApiRequest::get("/admin/stats"))?)
}

pub(crate) fn delete_record(
    client: &ApiClient<'_>,
    kind: RecordKind,
    id: u64,
) -> Result<Value, AppError> {
    Ok(client.send(ApiRequest::delete(format!(
        "/admin/{}/{id}",
        kind.resource()
    )))?)
}

//! The five `/students` endpoints.
//!
//! Every handler is a thin adapter: decode the request, make one store call,
//! encode the result. Errors leave through [`StudentError`]'s response mapping.

use percent_encoding::percent_decode_str;
use tracing::info;

use super::error::StudentError;
use super::id::StudentId;
use super::model::{Created, Message, Student, StudentFilter, StudentList, StudentPatch};
use crate::app::AppState;
use crate::request::Request;
use crate::response::Json;
use crate::status::Status;
use crate::store::StudentStore;

/// Upper bound on records returned by `GET /students`.
pub const LIST_LIMIT: usize = 100;

/// `POST /students` → `201 {"id": "<hex>"}`
pub async fn create<S: StudentStore>(
    req: Request,
    state: AppState<S>,
) -> Result<Json<Created>, StudentError> {
    let student: Student = req.json()?;
    let id = state.store.insert(student).await?;
    info!(%id, "student created");
    Ok(Json(Status::Created, Created { id: id.to_string() }))
}

/// `GET /students?country=..&age=..` → `200 {"data": [{name, age}, ...]}`
///
/// `age` is a lower bound, not an exact match. Empty parameters are ignored.
pub async fn list<S: StudentStore>(
    req: Request,
    state: AppState<S>,
) -> Result<Json<StudentList>, StudentError> {
    let filter = filter_from_query(&req)?;
    let data = state.store.list(&filter, LIST_LIMIT).await?;
    Ok(Json(Status::Ok, StudentList { data }))
}

/// `GET /students/{id}` → `200 {name, age, address}`
pub async fn get<S: StudentStore>(
    req: Request,
    state: AppState<S>,
) -> Result<Json<Student>, StudentError> {
    let id = path_id(&req)?;
    let student = state.store.find(&id).await?.ok_or(StudentError::NotFound)?;
    Ok(Json(Status::Ok, student))
}

/// `PATCH /students/{id}` → `204`
///
/// The empty-patch check runs before the id is parsed, so `{}` is rejected
/// without ever reaching the store.
pub async fn update<S: StudentStore>(
    req: Request,
    state: AppState<S>,
) -> Result<Status, StudentError> {
    let patch: StudentPatch = req.json()?;
    if patch.is_empty() {
        return Err(StudentError::NoFieldsProvided);
    }
    let id = path_id(&req)?;
    if !state.store.update(&id, patch).await? {
        return Err(StudentError::NotFound);
    }
    info!(%id, "student updated");
    Ok(Status::NoContent)
}

/// `DELETE /students/{id}` → `200 {"message": ...}`
pub async fn delete<S: StudentStore>(
    req: Request,
    state: AppState<S>,
) -> Result<Json<Message>, StudentError> {
    let id = path_id(&req)?;
    if !state.store.delete(&id).await? {
        return Err(StudentError::NotFound);
    }
    info!(%id, "student deleted");
    Ok(Json(Status::Ok, Message { message: "Student deleted successfully" }))
}

/// The `{id}` segment arrives percent-encoded, as sent on the wire.
fn path_id(req: &Request) -> Result<StudentId, StudentError> {
    let raw = req.param("id").unwrap_or_default();
    StudentId::parse(&percent_decode_str(raw).decode_utf8_lossy())
}

fn filter_from_query(req: &Request) -> Result<StudentFilter, StudentError> {
    let country = req.query("country").filter(|c| !c.is_empty());
    let min_age = req
        .query("age")
        .filter(|a| !a.is_empty())
        .map(|raw| raw.parse::<i64>())
        .transpose()
        .map_err(|e| StudentError::InvalidBody(format!("age: {e}")))?;
    Ok(StudentFilter { country, min_age })
}

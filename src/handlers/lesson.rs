use actix_web::{get, post, put, web::{self, Json}, HttpResponse};

use crate::{errors::CustomError, models::{checkout::get_lesson_applicants, lesson::{self, create_lesson, get_all_lessons, get_lesson, get_published_lessons, Lesson}}, schema::lesson::{ImageUploadResponse, LessonForm}, storage::{lesson_image_path, BlobStore}, GlobalState};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

fn lesson_not_found(lesson_no:i32) -> CustomError{
    CustomError::not_found(format!("Lesson #{} not found", lesson_no))
}

#[post("")]
pub async fn create_lesson_handler(data:web::Data<GlobalState>, form:Json<LessonForm>) -> Result<HttpResponse, CustomError>{

    form.validate()?;

    let lesson = create_lesson(&data.pool, &form).await?;

    tracing::info!(lesson_no = lesson.lesson_no, title = %lesson.title, "lesson created");

    Ok(HttpResponse::Created().json(lesson))
}

#[put("/{lesson_no}")]
pub async fn update_lesson_handler(data:web::Data<GlobalState>, form:Json<LessonForm>, path:web::Path<i32>) -> Result<HttpResponse, CustomError> {

    let lesson_no = path.into_inner();

    form.validate()?;

    let lesson = lesson::update_lesson(&data.pool, lesson_no, &form)
        .await?
        .ok_or_else(|| lesson_not_found(lesson_no))?;

    Ok(HttpResponse::Ok().json(lesson))
}

/// Removes a blob that is no longer referenced. Failures are logged, not returned.
async fn discard_blob(storage:&dyn BlobStore, path:&str){
    if let Err(e) = storage.delete(path).await {
        tracing::warn!(path, error = %e, "could not delete unreferenced image");
    }
}

/// Raw image body; the extension of `file_name` decides the stored file type.
/// The previous image of the lesson is deleted once the new one is saved.
#[put("/{lesson_no}/image/{file_name}")]
pub async fn upload_lesson_image_handler(data:web::Data<GlobalState>, path:web::Path<(i32, String)>, body:web::Bytes) -> Result<HttpResponse, CustomError> {

    let (lesson_no, file_name) = path.into_inner();

    let storage_path = lesson_image_path(&file_name)?;

    if body.is_empty(){
        return Err(CustomError::bad_request("Image is empty"));
    }

    let previous = get_lesson(&data.pool, lesson_no)
        .await?
        .ok_or_else(|| lesson_not_found(lesson_no))?
        .image_url;

    let storage: &dyn BlobStore = data.storage.as_ref();

    storage.upload(&storage_path, &body).await?;

    let url = storage.public_url(&storage_path);

    let saved = match lesson::set_lesson_image(&data.pool, lesson_no, &url).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => {
            discard_blob(storage, &storage_path).await;
            return Err(lesson_not_found(lesson_no));
        },
        Err(e) => {
            discard_blob(storage, &storage_path).await;
            return Err(e);
        },
    };

    if let Some(old_path) = previous.as_deref().and_then(|old| storage.path_for_url(old)) {
        discard_blob(storage, &old_path).await;
    }

    tracing::info!(lesson_no = saved.lesson_no, %url, "lesson image uploaded");

    Ok(HttpResponse::Ok().json(ImageUploadResponse{ url }))
}

/// Admin view, drafts included.
#[get("")]
pub async fn get_all_lessons_handler(data:web::Data<GlobalState>) -> Result<HttpResponse, CustomError> {

    let lessons = get_all_lessons(&data.pool).await?;

    Ok(HttpResponse::Ok().json(lessons))
}

#[get("/{lesson_no}/applicants")]
pub async fn get_lesson_applicants_handler(data:web::Data<GlobalState>, path:web::Path<i32>) -> Result<HttpResponse, CustomError> {

    let lesson_no = path.into_inner();

    if get_lesson(&data.pool, lesson_no).await?.is_none(){
        return Err(lesson_not_found(lesson_no));
    }

    let applicants = get_lesson_applicants(&data.pool, lesson_no).await?;

    Ok(HttpResponse::Ok().json(applicants))
}

#[get("")]
pub async fn get_published_lessons_handler(data:web::Data<GlobalState>) -> Result<HttpResponse, CustomError> {

    let lessons = get_published_lessons(&data.pool).await?;

    Ok(HttpResponse::Ok().json(lessons))
}

#[get("/{lesson_no}")]
pub async fn get_lesson_handler(data:web::Data<GlobalState>, path:web::Path<i32>) -> Result<HttpResponse, CustomError> {

    let lesson_no = path.into_inner();

    let lesson = get_lesson(&data.pool, lesson_no)
        .await?
        .filter(Lesson::is_published)
        .ok_or_else(|| lesson_not_found(lesson_no))?;

    Ok(HttpResponse::Ok().json(lesson))
}

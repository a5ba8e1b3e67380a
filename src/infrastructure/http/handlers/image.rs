//! Image Handlers
//!
//! 图片上传（multipart）与图片记录管理，文件落盘在 <upload_dir>/images/

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;
use validator::Validate;

use crate::application::ports::{ImageCategoryFilter, ImageRecord, NewImage};
use crate::application::services::{ImageStats, UpdateImage};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

/// 允许上传的图片 MIME 类型
static IMAGE_MIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^image/(jpeg|png|gif|webp|svg\+xml)$").expect("Invalid mime regex"));

// ============================================================================
// DTOs
// ============================================================================

/// 图片列表查询参数
///
/// categoryId 三态：缺省=全部；"null"/空串=未分类；数字=指定分类
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListImagesQuery {
    pub page: i64,
    pub page_size: i64,
    pub category_id: Option<String>,
}

impl Default for ListImagesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            category_id: None,
        }
    }
}

impl ListImagesQuery {
    fn filter(&self) -> Result<ImageCategoryFilter, ApiError> {
        match self.category_id.as_deref() {
            None => Ok(ImageCategoryFilter::All),
            Some("null") | Some("") => Ok(ImageCategoryFilter::Uncategorized),
            Some(raw) => raw
                .parse::<i64>()
                .map(ImageCategoryFilter::Category)
                .map_err(|_| ApiError::bad_request("分类ID格式错误")),
        }
    }
}

/// 更新图片请求
///
/// categoryId 需要区分"未提交"与"显式置空"，用双层 Option 表达
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageRequest {
    #[validate(length(min = 1, max = 255, message = "图片名称最多255个字符"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// 批量删除请求
#[derive(Debug, Deserialize, Validate)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传图片（multipart: file + 可选 name / categoryId）
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ImageRecord>>), ApiError> {
    let mut name: Option<String> = None;
    let mut category_id: Option<i64> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "name" => {
                name = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read name: {}", e))
                })?);
            }
            "categoryId" => {
                let raw = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read categoryId: {}", e))
                })?;
                category_id = raw.parse::<i64>().ok();
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read file: {}", e))
                })?;
                bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::bad_request("请选择要上传的文件"))?;

    // 验证文件类型
    let mime = content_type.unwrap_or_default();
    if !IMAGE_MIME_RE.is_match(&mime) {
        return Err(ApiError::bad_request("只允许上传图片文件"));
    }

    // 验证文件大小
    let max_size = state.config.storage.max_upload_size;
    if bytes.len() as u64 > max_size {
        return Err(ApiError::bad_request(format!(
            "图片大小不能超过 {} MB",
            max_size / 1024 / 1024
        )));
    }

    // 生成唯一文件名（保留原扩展名）
    let extension = file_name
        .as_deref()
        .and_then(|f| Path::new(f).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    let stored_name = format!("{}{}", Uuid::new_v4(), extension);

    // 落盘
    let images_dir = state.config.storage.upload_dir.join("images");
    fs::create_dir_all(&images_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {}", e)))?;
    let file_path = images_dir.join(&stored_name);
    fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to save file: {}", e)))?;

    tracing::info!(file = %file_path.display(), size = bytes.len(), "Image uploaded");

    // 写入图片记录
    let image = state
        .image_service
        .create(NewImage {
            name: name
                .filter(|n| !n.is_empty())
                .or(file_name)
                .unwrap_or_else(|| stored_name.clone()),
            url: format!("/uploads/images/{}", stored_name),
            size: bytes.len() as i64,
            mime_type: Some(mime),
            category_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(image))))
}

/// 获取图片统计信息
pub async fn image_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ImageStats>>, ApiError> {
    let stats = state.image_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取图片列表（分页，可按分类过滤）
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListImagesQuery>,
) -> Result<Json<ApiResponse<PaginationData<ImageRecord>>>, ApiError> {
    let filter = query.filter()?;
    let (list, total) = state
        .image_service
        .find_page(query.page, query.page_size, filter)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取图片详情
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<ImageRecord>>, ApiError> {
    let image = state.image_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(image, "获取成功")))
}

/// 更新图片信息
pub async fn update_image(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateImageRequest>,
) -> Result<Json<ApiResponse<ImageRecord>>, ApiError> {
    let image = state
        .image_service
        .update(
            id,
            UpdateImage {
                name: request.name,
                category_id: request.category_id,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(image)))
}

/// 软删除图片
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.image_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}

/// 批量软删除图片
pub async fn batch_delete_images(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<BatchDeleteRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.image_service.batch_remove(&request.ids).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}

//! 统一响应结构
//!
//! 所有 API 响应（成功或失败）都是同一形状：
//! `{ code, message, data, success }`
//!
//! 业务状态码与 HTTP 状态码解耦：HTTP 表达传输层结果，
//! code 表达领域层结果，二者不得混用

use serde::Serialize;

/// 业务状态码定义
pub mod code {
    /// 成功
    pub const SUCCESS: i32 = 2000;

    // 客户端错误 (4xxx)
    /// 请求参数错误
    pub const BAD_REQUEST: i32 = 4000;
    /// 未授权
    pub const UNAUTHORIZED: i32 = 4001;
    /// 禁止访问
    pub const FORBIDDEN: i32 = 4003;
    /// 资源不存在
    pub const NOT_FOUND: i32 = 4004;
    /// 数据验证失败
    pub const VALIDATION_ERROR: i32 = 4005;

    // 业务错误 (41xx)
    /// 用户不存在
    pub const USER_NOT_FOUND: i32 = 4100;
    /// 用户已存在
    pub const USER_ALREADY_EXISTS: i32 = 4101;
    /// 用户名或密码错误
    pub const INVALID_CREDENTIALS: i32 = 4102;
    /// 账号已被禁用
    pub const ACCOUNT_DISABLED: i32 = 4103;
    /// Token 已过期
    pub const TOKEN_EXPIRED: i32 = 4104;
    /// Token 无效
    pub const INVALID_TOKEN: i32 = 4105;

    // 服务端错误 (5xxx)
    /// 服务器内部错误
    pub const INTERNAL_ERROR: i32 = 5000;
    /// 数据库错误
    pub const DATABASE_ERROR: i32 = 5001;
    /// 外部 API 错误
    pub const EXTERNAL_API_ERROR: i32 = 5002;
}

/// 统一 API 响应格式
///
/// 不变式：success 当且仅当 code == SUCCESS；失败时 data 为 null
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "操作成功")
    }

    /// 成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: code::SUCCESS,
            message: message.into(),
            data: Some(data),
            success: true,
        }
    }

    /// 创建成功响应（配合 HTTP 201 使用）
    pub fn created(data: T) -> Self {
        Self::success_with_message(data, "创建成功")
    }

    /// 失败响应
    pub fn fail(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            success: false,
        }
    }

    /// 失败响应（携带数据）
    pub fn fail_with_data(code: i32, message: impl Into<String>, data: T) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
            success: false,
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

/// 分页数据（嵌套在 data 字段内）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationData<T: Serialize> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PaginationData<T> {
    /// totalPages = ceil(total / pageSize)；pageSize 为 0 时记为 0，不做除法
    pub fn new(list: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            list,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

impl<T: Serialize> ApiResponse<PaginationData<T>> {
    /// 分页成功响应
    pub fn paginated(list: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self::success_with_message(
            PaginationData::new(list, total, page, page_size),
            "获取成功",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_invariant() {
        let response = ApiResponse::success(42);
        assert_eq!(response.code, code::SUCCESS);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert_eq!(response.message, "操作成功");
    }

    #[test]
    fn test_fail_has_null_data() {
        let response: ApiResponse<i32> = ApiResponse::fail(code::NOT_FOUND, "资源不存在");
        assert!(!response.success);
        assert_eq!(response.data, None);

        let json = serde_json::to_value(&response).unwrap();
        // data 字段必须存在且为 null，而不是被省略
        assert!(json.get("data").unwrap().is_null());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(json["code"], 2000);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "ok");
        assert!(json.get("message").is_some());
    }

    #[test]
    fn test_pagination_total_pages() {
        let data = PaginationData::new(vec![1, 2, 3], 25, 2, 10);
        assert_eq!(data.total_pages, 3);

        let exact = PaginationData::new(Vec::<i32>::new(), 30, 1, 10);
        assert_eq!(exact.total_pages, 3);

        let empty = PaginationData::new(Vec::<i32>::new(), 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_pagination_zero_page_size_does_not_divide() {
        let data = PaginationData::new(Vec::<i32>::new(), 25, 1, 0);
        assert_eq!(data.total_pages, 0);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json =
            serde_json::to_value(ApiResponse::paginated(vec![1, 2], 25, 2, 10)).unwrap();
        assert_eq!(json["message"], "获取成功");
        let data = &json["data"];
        assert_eq!(data["pageSize"], 10);
        assert_eq!(data["totalPages"], 3);
        assert_eq!(data["list"].as_array().unwrap().len(), 2);
    }
}

use actix_web::HttpResponse;
use serde::Serialize;

/// Uniform response envelope: `{success, message?, count?, data?}`.
/// List endpoints carry `count`; mutations carry `message`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn message_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(data.len()),
            data: Some(data),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::data(data))
}

pub fn ok_list<T: Serialize>(data: Vec<T>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::list(data))
}

pub fn ok_message<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message_data(message, data))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::message_data(message, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_count() {
        let body = ApiResponse::list(vec![1, 2, 3]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn message_is_skipped_when_absent() {
        let body = ApiResponse::data(42);
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("message"));
        assert!(!json.contains("count"));
        assert!(json.contains("\"data\":42"));
    }

    #[test]
    fn mutation_envelope_carries_message() {
        let body = ApiResponse::message_data("Checked in successfully", serde_json::json!(null));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Checked in successfully");
    }
}

//! Typed declarations for every backend endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each method is a thin call through [`HttpClient`], so header injection,
//! envelope unwrapping, notifications, and the 401 side effect apply
//! uniformly. Server-owned payloads come back as `serde_json::Value`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::{Map, Value};

use super::error::ApiError;
use super::http::{HttpClient, RequestOptions};
use super::transport::Method;
use super::types::{
    CourseQuery, CreateOrderRequest, LoginData, LoginRequest, PasswordChange, Profile, RechargeRequest,
    RegisterRequest,
};

pub const LOGIN_ENDPOINT: &str = "/user/login";
pub const REGISTER_ENDPOINT: &str = "/user/register";
pub const PROFILE_ENDPOINT: &str = "/user/profile";
pub const PASSWORD_ENDPOINT: &str = "/user/password";
pub const COURSE_LIST_ENDPOINT: &str = "/course/list";
pub const COURSE_CREATE_ENDPOINT: &str = "/course";
pub const TEACHER_COURSES_ENDPOINT: &str = "/teacher/courses";
pub const CATEGORY_LIST_ENDPOINT: &str = "/category/list";
pub const CART_ENDPOINT: &str = "/cart";
pub const CART_CLEAR_ENDPOINT: &str = "/cart/clear";
pub const ORDER_CREATE_ENDPOINT: &str = "/order/create";
pub const ORDER_LIST_ENDPOINT: &str = "/order/list";
pub const BALANCE_INFO_ENDPOINT: &str = "/balance/info";
pub const BALANCE_RECHARGE_ENDPOINT: &str = "/balance/recharge";
pub const BALANCE_RECORDS_ENDPOINT: &str = "/balance/records";

fn course_endpoint(course_id: i64) -> String {
    format!("/course/{course_id}")
}

fn teacher_course_endpoint(course_id: i64) -> String {
    format!("/teacher/courses/{course_id}")
}

fn teacher_publish_endpoint(course_id: i64, publish: bool) -> String {
    let action = if publish { "publish" } else { "unpublish" };
    format!("/teacher/courses/{course_id}/{action}")
}

fn cart_add_endpoint(course_id: i64) -> String {
    format!("/cart/add/{course_id}")
}

fn cart_remove_endpoint(course_id: i64) -> String {
    format!("/cart/remove/{course_id}")
}

fn order_endpoint(order_no: &str) -> String {
    format!("/order/{order_no}")
}

fn order_pay_endpoint(order_no: &str) -> String {
    format!("/order/pay/{order_no}")
}

fn course_reviews_endpoint(course_id: i64) -> String {
    format!("/review/course/{course_id}")
}

/// Endpoint catalogue over a shared [`HttpClient`].
#[derive(Clone)]
pub struct Api {
    http: HttpClient,
}

impl Api {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.http
            .request(Method::Post, path, None, RequestOptions::default())
            .await
    }

    async fn put_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.http
            .request(Method::Put, path, None, RequestOptions::default())
            .await
    }

    // =========================================================================
    // USER
    // =========================================================================

    /// `POST /user/login`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginData, ApiError> {
        self.http.post(LOGIN_ENDPOINT, credentials).await
    }

    /// `POST /user/register`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn register(&self, user: &RegisterRequest) -> Result<Value, ApiError> {
        self.http.post(REGISTER_ENDPOINT, user).await
    }

    /// `GET /user/profile`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.http.get(PROFILE_ENDPOINT).await
    }

    /// `PUT /user/profile`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn update_profile(&self, fields: &Map<String, Value>) -> Result<Value, ApiError> {
        self.http.put(PROFILE_ENDPOINT, fields).await
    }

    /// `PUT /user/password`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Value, ApiError> {
        self.http.put(PASSWORD_ENDPOINT, change).await
    }

    // =========================================================================
    // COURSE
    // =========================================================================

    /// `GET /course/list` with filters as query parameters.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn list_courses(&self, query: &CourseQuery) -> Result<Value, ApiError> {
        self.http.get_query(COURSE_LIST_ENDPOINT, query).await
    }

    /// `GET /course/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn course(&self, course_id: i64) -> Result<Value, ApiError> {
        self.http.get(&course_endpoint(course_id)).await
    }

    /// `POST /course`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn create_course(&self, course: &Value) -> Result<Value, ApiError> {
        self.http.post(COURSE_CREATE_ENDPOINT, course).await
    }

    /// `PUT /course/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn update_course(&self, course_id: i64, course: &Value) -> Result<Value, ApiError> {
        self.http.put(&course_endpoint(course_id), course).await
    }

    /// `DELETE /course/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn delete_course(&self, course_id: i64) -> Result<Value, ApiError> {
        self.http.delete(&course_endpoint(course_id)).await
    }

    /// `GET /category/list`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn categories(&self) -> Result<Value, ApiError> {
        self.http.get(CATEGORY_LIST_ENDPOINT).await
    }

    // =========================================================================
    // TEACHER
    // =========================================================================

    /// `GET /teacher/courses`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn teacher_courses(&self) -> Result<Value, ApiError> {
        self.http.get(TEACHER_COURSES_ENDPOINT).await
    }

    /// `POST /teacher/courses`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn create_teacher_course(&self, course: &Value) -> Result<Value, ApiError> {
        self.http.post(TEACHER_COURSES_ENDPOINT, course).await
    }

    /// `PUT /teacher/courses/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn update_teacher_course(&self, course_id: i64, course: &Value) -> Result<Value, ApiError> {
        self.http
            .put(&teacher_course_endpoint(course_id), course)
            .await
    }

    /// `DELETE /teacher/courses/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn delete_teacher_course(&self, course_id: i64) -> Result<Value, ApiError> {
        self.http.delete(&teacher_course_endpoint(course_id)).await
    }

    /// `PUT /teacher/courses/{id}/publish` or `/unpublish`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn set_course_published(&self, course_id: i64, publish: bool) -> Result<Value, ApiError> {
        self.put_empty(&teacher_publish_endpoint(course_id, publish))
            .await
    }

    // =========================================================================
    // CART
    // =========================================================================

    /// `GET /cart`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn cart(&self) -> Result<Value, ApiError> {
        self.http.get(CART_ENDPOINT).await
    }

    /// `POST /cart/add/{courseId}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn add_to_cart(&self, course_id: i64) -> Result<Value, ApiError> {
        self.post_empty(&cart_add_endpoint(course_id)).await
    }

    /// `DELETE /cart/remove/{courseId}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn remove_from_cart(&self, course_id: i64) -> Result<Value, ApiError> {
        self.http.delete(&cart_remove_endpoint(course_id)).await
    }

    /// `DELETE /cart/clear`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn clear_cart(&self) -> Result<Value, ApiError> {
        self.http.delete(CART_CLEAR_ENDPOINT).await
    }

    // =========================================================================
    // ORDER
    // =========================================================================

    /// `POST /order/create`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<Value, ApiError> {
        self.http.post(ORDER_CREATE_ENDPOINT, order).await
    }

    /// `GET /order/list`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn orders(&self) -> Result<Value, ApiError> {
        self.http.get(ORDER_LIST_ENDPOINT).await
    }

    /// `GET /order/{orderNo}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn order(&self, order_no: &str) -> Result<Value, ApiError> {
        self.http.get(&order_endpoint(order_no)).await
    }

    /// `POST /order/pay/{orderNo}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn pay_order(&self, order_no: &str) -> Result<Value, ApiError> {
        self.post_empty(&order_pay_endpoint(order_no)).await
    }

    // =========================================================================
    // REVIEW
    // =========================================================================

    /// `GET /review/course/{courseId}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn course_reviews(&self, course_id: i64) -> Result<Value, ApiError> {
        self.http.get(&course_reviews_endpoint(course_id)).await
    }

    /// `POST /review/course/{courseId}`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn add_review(&self, course_id: i64, review: &Value) -> Result<Value, ApiError> {
        self.http
            .post(&course_reviews_endpoint(course_id), review)
            .await
    }

    // =========================================================================
    // BALANCE
    // =========================================================================

    /// `GET /balance/info`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn balance(&self) -> Result<Value, ApiError> {
        self.http.get(BALANCE_INFO_ENDPOINT).await
    }

    /// `POST /balance/recharge`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn recharge(&self, recharge: &RechargeRequest) -> Result<Value, ApiError> {
        self.http.post(BALANCE_RECHARGE_ENDPOINT, recharge).await
    }

    /// `GET /balance/records`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the HTTP client.
    pub async fn recharge_records(&self) -> Result<Value, ApiError> {
        self.http.get(BALANCE_RECORDS_ENDPOINT).await
    }
}

use super::*;

#[test]
fn status_message_fixed_table() {
    assert_eq!(status_message(401, Some("token expired")), MSG_UNAUTHORIZED);
    assert_eq!(status_message(403, None), MSG_FORBIDDEN);
    assert_eq!(status_message(404, None), MSG_NOT_FOUND);
    assert_eq!(status_message(500, Some("NPE")), MSG_SERVER_ERROR);
}

#[test]
fn status_message_unmapped_prefers_server_msg() {
    assert_eq!(status_message(409, Some("already in cart")), "already in cart");
}

#[test]
fn status_message_unmapped_falls_back_to_transport_wording() {
    assert_eq!(status_message(502, None), "Request failed with status code 502");
    assert_eq!(status_message(418, Some("   ")), "Request failed with status code 418");
}

#[test]
fn business_defaults_message() {
    assert_eq!(ApiError::business(1, None).message(), MSG_OPERATION_FAILED);
    assert_eq!(ApiError::business(1, Some("")).message(), MSG_OPERATION_FAILED);
    assert_eq!(ApiError::business(1, Some("bad credentials")).message(), "bad credentials");
}

#[test]
fn unauthorized_detection() {
    assert!(ApiError::status(401, None).is_unauthorized());
    assert!(!ApiError::status(403, None).is_unauthorized());
    assert!(!ApiError::business(401, Some("code 401 is not a status")).is_unauthorized());
}

#[test]
fn transport_errors_map_to_network_or_config() {
    let timeout: ApiError = TransportError::Timeout.into();
    assert!(matches!(timeout, ApiError::Network { .. }));
    assert_eq!(timeout.message(), MSG_NETWORK);

    let refused: ApiError = TransportError::Connect("refused".into()).into();
    assert!(matches!(&refused, ApiError::Network { detail } if detail.contains("refused")));

    let bad: ApiError = TransportError::InvalidRequest("bad header".into()).into();
    assert_eq!(bad.message(), MSG_REQUEST_CONFIG);
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ApiError::business(1, None).error_code(), "E_BUSINESS");
    assert_eq!(ApiError::status(401, None).error_code(), "E_UNAUTHORIZED");
    assert_eq!(ApiError::status(403, None).error_code(), "E_FORBIDDEN");
    assert_eq!(ApiError::status(404, None).error_code(), "E_NOT_FOUND");
    assert_eq!(ApiError::status(503, None).error_code(), "E_HTTP_STATUS");
    assert_eq!(ApiError::Decode { detail: String::new() }.error_code(), "E_DECODE");
}

#[test]
fn failure_shape() {
    let failure = ApiError::business(1, Some("bad credentials")).failure();
    assert_eq!(
        serde_json::to_value(&failure).unwrap(),
        serde_json::json!({ "success": false, "message": "bad credentials" })
    );
}

use serde::Serialize;
use warp::http::StatusCode;

use crate::entities::{ClientError, InternalServerError};
use crate::StdError;

pub fn json<T>(value: &T, status_code: StatusCode) -> Box<dyn warp::Reply>
where
    T: Serialize,
{
    Box::new(warp::reply::with_status(
        warp::reply::json(value),
        status_code,
    ))
}

pub fn empty(status_code: StatusCode) -> Box<dyn warp::Reply> {
    Box::new(warp::reply::with_status(warp::reply::reply(), status_code))
}

pub fn bad_request(label: String, message: String) -> Box<dyn warp::Reply> {
    json(&ClientError::new(label, message), StatusCode::BAD_REQUEST)
}

pub fn server_error<E: Into<StdError>>(error: E) -> Box<dyn warp::Reply> {
    let std_error: StdError = error.into();

    // Only the top level message crosses the boundary, never the error chain.
    json(
        &InternalServerError::new(std_error.to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use warp::Reply;

    use super::*;

    #[test]
    fn server_error_converts_std_error_to_500() {
        let error = anyhow!("Some error");
        let response = server_error(error).into_response();

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    }

    #[test]
    fn bad_request_converts_to_400() {
        let response =
            bad_request("label".to_string(), "message".to_string()).into_response();

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    }
}

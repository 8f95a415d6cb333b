//! Response contract between resources and the host environment.

use http::StatusCode;

/// What a resource may do to the response.
///
/// Adapters to a real transport implement this; resources never see the
/// transport itself.
pub trait Response {
    fn set_content_type(&mut self, content_type: &str);

    fn write(&mut self, text: &str);

    fn not_found(&mut self);

    fn forbidden(&mut self);

    /// External redirect: the client is told to fetch `target`.
    fn redirect(&mut self, target: &str);

    fn log(&mut self, message: &str);
}

/// In-memory response.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
    location: Option<String>,
    log: Vec<String>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Redirect target, if one was set.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }
}

impl Response for BufferedResponse {
    fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    fn write(&mut self, text: &str) {
        self.body.push_str(text);
    }

    fn not_found(&mut self) {
        self.status = StatusCode::NOT_FOUND;
    }

    fn forbidden(&mut self) {
        self.status = StatusCode::FORBIDDEN;
    }

    fn redirect(&mut self, target: &str) {
        self.status = StatusCode::FOUND;
        self.location = Some(target.to_string());
    }

    fn log(&mut self, message: &str) {
        tracing::debug!(message, "resource log");
        self.log.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_response() {
        let mut resp = BufferedResponse::new();
        assert_eq!(resp.status(), StatusCode::OK);

        resp.set_content_type("text/plain");
        resp.write("hello ");
        resp.write("world");
        assert_eq!(resp.body(), "hello world");
        assert_eq!(resp.content_type(), Some("text/plain"));

        resp.redirect("/home");
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.location(), Some("/home"));
    }
}

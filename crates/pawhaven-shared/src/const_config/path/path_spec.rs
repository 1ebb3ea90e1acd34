use reqwest::Method;

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub path: &'static str,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
        }
    }

    /// Replaces the `{}` placeholder in the path with `segment`
    ///
    /// Paths without a placeholder are returned unchanged
    pub fn with_segment(&self, segment: impl std::fmt::Display) -> String {
        self.path.replacen("{}", &segment.to_string(), 1)
    }
}

use super::RequestsLoggingLevel;

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    pub port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Path to a frontend directory to be statically served instead of the
    /// status endpoint.
    pub frontend_dir_path: Option<String>,
}

use thiserror::Error;

/// Server startup/runtime errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器启动路径的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

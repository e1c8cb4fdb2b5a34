//! # Error 模块
//!
//! 定义 scene-runtime 中使用的错误类型。
//!
//! 错误只出现在外部脚本数据的构建路径上；序列一旦构建成功，
//! 运行期不再有可恢复的失败（构造期缺陷直接 panic）。

use thiserror::Error;

/// 演出脚本构建错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// 脚本数据无法解析
    #[error("脚本格式无效: {message}")]
    InvalidScript { message: String },

    /// 脚本不包含任何片段
    #[error("脚本不包含任何片段")]
    EmptyScript,

    /// 引用了未注册的目标
    #[error("目标 '{name}' 未在 Cast 中注册")]
    UnknownTarget { name: String },

    /// 把文本效果绑定到了不具备文本能力的目标
    #[error("目标 '{name}' 不支持文本效果")]
    TextNotSupported { name: String },
}

/// Result 类型别名
pub type ScriptResult<T> = Result<T, ScriptError>;

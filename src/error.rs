//! 统一错误类型模块
//!
//! 提供 otprs 库中所有操作的错误类型定义。

use std::fmt;

/// otprs 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// otprs 库的错误类型
#[derive(Debug)]
pub enum Error {
    /// Base32 密钥解码错误
    Decode(DecodeError),

    /// 密钥材料错误
    Key(KeyError),

    /// 配置错误
    Config(ConfigError),

    /// 加密错误
    Crypto(CryptoError),
}

/// Base32 解码相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// 密钥为空
    EmptySecret,
    /// 遇到 Base32 字母表之外的字符
    InvalidCharacter {
        /// 字符在规范化后输入中的位置
        position: usize,
        /// 非法字符
        character: char,
    },
    /// 去除填充后的长度不是合法的 Base32 块长度
    InvalidLength(usize),
    /// 填充字符 `=` 的位置或数量不合法
    InvalidPadding,
}

/// 密钥材料相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// 密钥为空字节序列
    EmptyKey,
    /// 密钥材料无法用于 HMAC 初始化
    InvalidKey(String),
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 验证码位数超出 [6, 8] 范围
    InvalidDigits(u32),
    /// 时间步长为零
    InvalidTimeStep(u64),
}

/// 加密相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// 随机数生成失败
    RngFailed(String),
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "Decode error: {}", e),
            Error::Key(e) => write!(f, "Key error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Crypto(e) => write!(f, "Crypto error: {}", e),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::EmptySecret => write!(f, "secret cannot be empty"),
            DecodeError::InvalidCharacter {
                position,
                character,
            } => {
                write!(
                    f,
                    "invalid base32 character '{}' at position {}",
                    character, position
                )
            }
            DecodeError::InvalidLength(len) => {
                write!(f, "invalid base32 length: {} characters", len)
            }
            DecodeError::InvalidPadding => write!(f, "invalid base32 padding"),
        }
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::EmptyKey => write!(f, "key material cannot be empty"),
            KeyError::InvalidKey(msg) => write!(f, "invalid key material: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDigits(digits) => {
                write!(f, "digits must be between 6 and 8, got {}", digits)
            }
            ConfigError::InvalidTimeStep(step) => {
                write!(f, "time step must be positive, got {}", step)
            }
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::RngFailed(msg) => write!(f, "random number generation failed: {}", msg),
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::error::Error for DecodeError {}
impl std::error::Error for KeyError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for CryptoError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        Error::Key(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}

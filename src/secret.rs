//! 密钥编码模块
//!
//! 提供 OTP 共享密钥的 Base32 (RFC 4648) 编解码功能。
//!
//! ## 特性
//!
//! - 严格的 RFC 4648 校验：非法字符、非法长度和非法填充都会被拒绝
//! - 大小写不敏感，自动去除用户输入中的空格和连字符
//! - 支持从原始字节或随机生成创建密钥
//!
//! ## 示例
//!
//! ```rust
//! use otprs::secret::OtpSecret;
//!
//! // 从 Base32 字符串解码（认证器应用常见格式）
//! let secret = OtpSecret::from_base32("JBSWY3DPEHPK3PXP").unwrap();
//! assert_eq!(secret.raw.len(), 10);
//!
//! // 从原始字节创建
//! let secret = OtpSecret::from_bytes(b"12345678901234567890".to_vec());
//! assert!(!secret.base32.is_empty());
//! ```

use base32::{Alphabet, decode as base32_decode, encode as base32_encode};

use crate::error::{DecodeError, Result};
use crate::random::generate_random_bytes;

/// OTP 密钥信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpSecret {
    /// 原始密钥字节
    pub raw: Vec<u8>,

    /// Base32 编码的密钥（规范化、无填充，用于显示）
    pub base32: String,
}

impl OtpSecret {
    /// 从原始字节创建
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let base32 = base32_encode(Alphabet::Rfc4648 { padding: false }, &bytes);
        Self { raw: bytes, base32 }
    }

    /// 从 Base32 字符串创建
    ///
    /// 输入大小写不敏感，空格和连字符会被去除，尾部的 `=` 填充会被校验后去除。
    ///
    /// # Errors
    ///
    /// * [`DecodeError::EmptySecret`] - 去除填充后输入为空
    /// * [`DecodeError::InvalidCharacter`] - 遇到 `A-Z2-7` 之外的字符
    /// * [`DecodeError::InvalidLength`] - 长度模 8 余 1、3 或 6
    /// * [`DecodeError::InvalidPadding`] - `=` 出现在中间，或填充后总长不是 8 的倍数
    pub fn from_base32(secret: &str) -> Result<Self> {
        let clean = secret.replace([' ', '-'], "").to_uppercase();

        let stripped = clean.trim_end_matches('=');
        if stripped.contains('=') {
            return Err(DecodeError::InvalidPadding.into());
        }
        if stripped.len() != clean.len() && clean.len() % 8 != 0 {
            return Err(DecodeError::InvalidPadding.into());
        }

        if stripped.is_empty() {
            return Err(DecodeError::EmptySecret.into());
        }

        for (position, character) in stripped.chars().enumerate() {
            let valid = character.is_ascii_uppercase() || ('2'..='7').contains(&character);
            if !valid {
                return Err(DecodeError::InvalidCharacter {
                    position,
                    character,
                }
                .into());
            }
        }

        // 合法的 Base32 块尾长度为 {0, 2, 4, 5, 7} mod 8
        if matches!(stripped.len() % 8, 1 | 3 | 6) {
            return Err(DecodeError::InvalidLength(stripped.len()).into());
        }

        let raw = base32_decode(Alphabet::Rfc4648 { padding: false }, stripped)
            .ok_or(DecodeError::InvalidLength(stripped.len()))?;

        Ok(Self {
            raw,
            base32: stripped.to_string(),
        })
    }

    /// 生成指定长度的随机密钥
    ///
    /// 使用操作系统 CSPRNG 生成密钥字节。
    pub fn generate(length: usize) -> Result<Self> {
        let bytes = generate_random_bytes(length)?;
        Ok(Self::from_bytes(bytes))
    }
}

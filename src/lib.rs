//! # OtpRS
//!
//! 一个 RFC 4226 / RFC 6238 一次性密码 (HOTP/TOTP) 库。
//!
//! ## 功能特性
//!
//! - **TOTP**: 基于时间的一次性密码 (Google Authenticator 兼容)
//! - **HOTP**: 基于计数器的一次性密码，支持同步窗口
//! - **Base32 密钥编解码**: 严格的 RFC 4648 校验
//! - **多种哈希算法**: SHA-1（默认）、SHA-256、SHA-512
//! - **常量时间比较**: 验证码比对防止时序攻击
//! - **安全随机数**: 密码学安全的密钥生成
//!
//! 所有默认值都是显式配置项：6 位验证码、30 秒时间步长、SHA-1 算法、
//! 前后各 1 个时间步的偏差窗口。
//!
//! ## TOTP 示例
//!
//! ```rust
//! use otprs::totp::{TotpConfig, TotpManager};
//! use otprs::secret::OtpSecret;
//!
//! // 从认证器应用中的 Base32 密钥恢复
//! let secret = OtpSecret::from_base32("JBSWY3DPEHPK3PXP").unwrap();
//!
//! // 生成并验证当前验证码
//! let manager = TotpManager::default_manager();
//! let code = manager.generate_code(&secret).unwrap();
//! assert!(manager.verify(&secret, &code).unwrap());
//! ```
//!
//! ## HOTP 示例
//!
//! ```rust
//! use otprs::hotp::HotpGenerator;
//! use otprs::secret::OtpSecret;
//!
//! let generator = HotpGenerator::default_generator();
//! let secret = OtpSecret::from_bytes(b"12345678901234567890".to_vec());
//!
//! // RFC 4226 附录 D 的第一个测试向量
//! let code = generator.generate(&secret, 0).unwrap();
//! assert_eq!(code, "755224");
//! ```
//!
//! ## 便捷函数
//!
//! ```rust
//! // 等价于原始用法：decode -> 当前时间步 -> HMAC-SHA1 -> 6 位码
//! let otp = otprs::get_otp("JBSWY3DPEHPK3PXP").unwrap();
//! assert_eq!(otp.len(), 6);
//! ```

pub mod error;
pub mod hotp;
pub mod random;
pub mod secret;
pub mod totp;

pub use error::{ConfigError, CryptoError, DecodeError, Error, KeyError, Result};

// ============================================================================
// 密钥相关导出
// ============================================================================

pub use secret::OtpSecret;

// ============================================================================
// 随机数生成函数导出
// ============================================================================

pub use random::{constant_time_compare, constant_time_compare_str, generate_random_bytes};

// ============================================================================
// OTP 引擎导出
// ============================================================================

pub use hotp::{Algorithm, HotpConfig, HotpGenerator, HotpVerifyResult};
pub use totp::{TotpConfig, TotpManager, TotpVerifyResult, get_otp};

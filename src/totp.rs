//! TOTP (基于时间的一次性密码) 实现模块
//!
//! 提供 TOTP 的生成和验证功能，兼容 Google Authenticator、Authy 等应用。
//!
//! ## 特性
//!
//! - 符合 RFC 6238 标准
//! - 支持自定义时间步长和位数
//! - 支持时间偏差窗口验证（容忍时钟漂移）
//!
//! ## 示例
//!
//! ```rust
//! use otprs::totp::{TotpConfig, TotpManager};
//! use otprs::secret::OtpSecret;
//!
//! // 创建 TOTP 管理器
//! let manager = TotpManager::default_manager();
//!
//! // 从 Base32 字符串恢复密钥
//! let secret = OtpSecret::from_base32("JBSWY3DPEHPK3PXP").unwrap();
//!
//! // 生成当前 TOTP 码
//! let code = manager.generate_code(&secret).unwrap();
//! assert_eq!(code.len(), 6);
//!
//! // 验证用户输入的码
//! let is_valid = manager.verify(&secret, &code).unwrap();
//! assert!(is_valid);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ConfigError, Result};
use crate::hotp::{Algorithm, hotp};
use crate::random::constant_time_compare;
use crate::secret::OtpSecret;

/// TOTP 配置
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// 时间步长（秒），必须为正，默认 30 秒
    pub time_step: u64,

    /// 验证码位数，合法范围 [6, 8]，默认 6 位
    pub digits: u32,

    /// 哈希算法
    pub algorithm: Algorithm,

    /// 允许的时间偏差窗口（前后各多少个时间步）
    /// 默认为 1，即允许前后各 30 秒的误差
    pub skew: u64,

    /// 密钥长度（字节），默认 20 字节（160 位）
    pub secret_length: usize,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            time_step: 30,
            digits: 6,
            algorithm: Algorithm::SHA1,
            skew: 1,
            secret_length: 20,
        }
    }
}

impl TotpConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置时间步长
    pub fn with_time_step(mut self, seconds: u64) -> Self {
        self.time_step = seconds;
        self
    }

    /// 设置验证码位数
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    /// 设置哈希算法
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// 设置时间偏差窗口
    pub fn with_skew(mut self, skew: u64) -> Self {
        self.skew = skew;
        self
    }

    /// 设置密钥长度
    pub fn with_secret_length(mut self, length: usize) -> Self {
        self.secret_length = length;
        self
    }

    /// 创建 Google Authenticator 兼容配置
    pub fn google_authenticator() -> Self {
        Self {
            time_step: 30,
            digits: 6,
            algorithm: Algorithm::SHA1,
            skew: 1,
            secret_length: 20,
        }
    }

    /// 创建高安全性配置
    pub fn high_security() -> Self {
        Self {
            time_step: 30,
            digits: 8,
            algorithm: Algorithm::SHA256,
            skew: 0,
            secret_length: 32,
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.time_step == 0 {
            return Err(ConfigError::InvalidTimeStep(self.time_step).into());
        }
        if !(6..=8).contains(&self.digits) {
            return Err(ConfigError::InvalidDigits(self.digits).into());
        }
        Ok(())
    }
}

/// TOTP 验证结果
#[derive(Debug, Clone)]
pub struct TotpVerifyResult {
    /// 是否验证成功
    pub valid: bool,

    /// 匹配的时间步偏移量（0 表示当前步，负数表示过去，正数表示未来）
    pub time_step_offset: i64,

    /// 验证时的 Unix 时间戳（秒）
    pub verified_at: u64,
}

/// TOTP 管理器
#[derive(Debug, Clone)]
pub struct TotpManager {
    config: TotpConfig,
}

impl TotpManager {
    /// 创建新的 TOTP 管理器
    ///
    /// # Errors
    ///
    /// 配置非法时返回 [`ConfigError`]
    pub fn new(config: TotpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 使用默认配置创建管理器
    pub fn default_manager() -> Self {
        Self {
            config: TotpConfig::default(),
        }
    }

    /// 生成新的 TOTP 密钥
    pub fn generate_secret(&self) -> Result<OtpSecret> {
        OtpSecret::generate(self.config.secret_length)
    }

    /// 生成当前的 TOTP 验证码
    pub fn generate_code(&self, secret: &OtpSecret) -> Result<String> {
        let timestamp = current_timestamp();
        self.generate_code_at(secret, timestamp)
    }

    /// 生成指定时间的 TOTP 验证码
    ///
    /// # 参数
    ///
    /// * `secret` - 密钥
    /// * `timestamp` - Unix 时间戳（秒）
    pub fn generate_code_at(&self, secret: &OtpSecret, timestamp: u64) -> Result<String> {
        self.config.validate()?;
        let counter = timestamp / self.config.time_step;
        hotp(&secret.raw, counter, self.config.digits, self.config.algorithm)
    }

    /// 验证 TOTP 验证码（以当前时间为基准）
    pub fn verify(&self, secret: &OtpSecret, code: &str) -> Result<bool> {
        self.verify_at(secret, code, current_timestamp())
    }

    /// 验证指定时间的 TOTP 验证码
    pub fn verify_at(&self, secret: &OtpSecret, code: &str, timestamp: u64) -> Result<bool> {
        let result = self.verify_with_result_at(secret, code, timestamp)?;
        Ok(result.valid)
    }

    /// 验证 TOTP 验证码并返回详细结果
    pub fn verify_with_result(&self, secret: &OtpSecret, code: &str) -> Result<TotpVerifyResult> {
        self.verify_with_result_at(secret, code, current_timestamp())
    }

    /// 验证指定时间的 TOTP 验证码并返回详细结果
    ///
    /// 在 `[counter - skew, counter + skew]` 范围内逐一比对，比较为常量时间。
    pub fn verify_with_result_at(
        &self,
        secret: &OtpSecret,
        code: &str,
        timestamp: u64,
    ) -> Result<TotpVerifyResult> {
        self.config.validate()?;
        let current_counter = timestamp / self.config.time_step;

        // 规范化输入码
        let normalized_code = code.replace([' ', '-'], "");

        // 检查码的长度
        if normalized_code.len() != self.config.digits as usize {
            return Ok(TotpVerifyResult {
                valid: false,
                time_step_offset: 0,
                verified_at: timestamp,
            });
        }

        // 在允许的时间窗口内检查
        for offset in -(self.config.skew as i64)..=(self.config.skew as i64) {
            let check_counter = current_counter as i64 + offset;
            if check_counter < 0 {
                // 纪元之前没有时间步
                continue;
            }
            let expected_code = hotp(
                &secret.raw,
                check_counter as u64,
                self.config.digits,
                self.config.algorithm,
            )?;

            if constant_time_compare(normalized_code.as_bytes(), expected_code.as_bytes()) {
                return Ok(TotpVerifyResult {
                    valid: true,
                    time_step_offset: offset,
                    verified_at: timestamp,
                });
            }
        }

        Ok(TotpVerifyResult {
            valid: false,
            time_step_offset: 0,
            verified_at: timestamp,
        })
    }

    /// 获取当前验证码的剩余有效时间（秒）
    pub fn time_remaining(&self) -> u64 {
        let timestamp = current_timestamp();
        self.config.time_step - (timestamp % self.config.time_step)
    }

    /// 获取配置
    pub fn config(&self) -> &TotpConfig {
        &self.config
    }
}

/// 获取当前 Unix 时间戳
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// 便捷函数：使用默认配置从 Base32 密钥生成当前验证码
///
/// # Example
///
/// ```rust
/// use otprs::totp::get_otp;
///
/// let code = get_otp("JBSWY3DPEHPK3PXP").unwrap();
/// assert_eq!(code.len(), 6);
/// ```
pub fn get_otp(secret: &str) -> Result<String> {
    let secret = OtpSecret::from_base32(secret)?;
    TotpManager::default_manager().generate_code(&secret)
}

//! HOTP (基于计数器的一次性密码) 实现模块
//!
//! 提供 HOTP 的生成和验证功能。
//!
//! ## 特性
//!
//! - 符合 RFC 4226 标准
//! - 支持 6-8 位验证码和 SHA-1/SHA-256/SHA-512 算法
//! - 支持计数器同步窗口
//!
//! ## 示例
//!
//! ```rust
//! use otprs::hotp::{HotpConfig, HotpGenerator};
//!
//! // 创建 HOTP 生成器
//! let generator = HotpGenerator::default_generator();
//!
//! // 生成密钥
//! let secret = generator.generate_secret().unwrap();
//!
//! // 生成指定计数器的 HOTP 码
//! let code = generator.generate(&secret, 0).unwrap();
//!
//! // 验证用户输入的码
//! let (is_valid, next_counter) = generator.verify(&secret, &code, 0).unwrap();
//! assert!(is_valid);
//! assert_eq!(next_counter, 1);
//! ```

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::error::{ConfigError, Error, KeyError, Result};
use crate::random::constant_time_compare;
use crate::secret::OtpSecret;

/// OTP 哈希算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// SHA-1（默认，最广泛支持）
    #[default]
    SHA1,
    /// SHA-256
    SHA256,
    /// SHA-512
    SHA512,
}

impl Algorithm {
    /// 获取算法名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::SHA1 => "SHA1",
            Algorithm::SHA256 => "SHA256",
            Algorithm::SHA512 => "SHA512",
        }
    }
}

/// HOTP 配置
#[derive(Debug, Clone)]
pub struct HotpConfig {
    /// 验证码位数，合法范围 [6, 8]，默认 6 位
    pub digits: u32,

    /// 哈希算法
    pub algorithm: Algorithm,

    /// 同步窗口大小（向前查找的计数器数量）
    pub look_ahead_window: u64,

    /// 密钥长度（字节），默认 20 字节（160 位）
    pub secret_length: usize,
}

impl Default for HotpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            algorithm: Algorithm::SHA1,
            look_ahead_window: 10,
            secret_length: 20,
        }
    }
}

impl HotpConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
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

    /// 设置同步窗口大小
    pub fn with_look_ahead_window(mut self, window: u64) -> Self {
        self.look_ahead_window = window;
        self
    }

    /// 设置密钥长度
    pub fn with_secret_length(mut self, length: usize) -> Self {
        self.secret_length = length;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !(6..=8).contains(&self.digits) {
            return Err(ConfigError::InvalidDigits(self.digits).into());
        }
        Ok(())
    }
}

/// HOTP 验证结果
#[derive(Debug, Clone)]
pub struct HotpVerifyResult {
    /// 是否验证成功
    pub valid: bool,

    /// 匹配时的计数器值（如果验证成功）
    pub matched_counter: Option<u64>,

    /// 建议的下一个计数器值
    pub next_counter: u64,
}

/// HOTP 生成器
#[derive(Debug, Clone)]
pub struct HotpGenerator {
    config: HotpConfig,
}

impl HotpGenerator {
    /// 创建新的 HOTP 生成器
    ///
    /// # Errors
    ///
    /// 配置非法时返回 [`ConfigError`]
    pub fn new(config: HotpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 使用默认配置创建生成器
    pub fn default_generator() -> Self {
        Self {
            config: HotpConfig::default(),
        }
    }

    /// 生成新的 HOTP 密钥
    pub fn generate_secret(&self) -> Result<OtpSecret> {
        OtpSecret::generate(self.config.secret_length)
    }

    /// 生成 HOTP 验证码
    ///
    /// # 参数
    ///
    /// * `secret` - 密钥
    /// * `counter` - 计数器值
    ///
    /// # 返回
    ///
    /// 返回生成的验证码字符串
    pub fn generate(&self, secret: &OtpSecret, counter: u64) -> Result<String> {
        self.generate_raw(&secret.raw, counter)
    }

    /// 使用原始密钥字节生成 HOTP 验证码
    pub fn generate_raw(&self, key: &[u8], counter: u64) -> Result<String> {
        self.config.validate()?;
        hotp(key, counter, self.config.digits, self.config.algorithm)
    }

    /// 验证 HOTP 验证码
    ///
    /// # 参数
    ///
    /// * `secret` - 密钥
    /// * `code` - 用户输入的验证码
    /// * `counter` - 当前计数器值
    ///
    /// # 返回
    ///
    /// 返回 (是否有效, 新的计数器值)
    pub fn verify(&self, secret: &OtpSecret, code: &str, counter: u64) -> Result<(bool, u64)> {
        let result = self.verify_with_result(secret, code, counter)?;
        Ok((result.valid, result.next_counter))
    }

    /// 验证 HOTP 验证码并返回详细结果
    pub fn verify_with_result(
        &self,
        secret: &OtpSecret,
        code: &str,
        counter: u64,
    ) -> Result<HotpVerifyResult> {
        self.config.validate()?;

        // 规范化输入码
        let normalized_code = code.replace([' ', '-'], "");

        // 检查码的长度
        if normalized_code.len() != self.config.digits as usize {
            return Ok(HotpVerifyResult {
                valid: false,
                matched_counter: None,
                next_counter: counter,
            });
        }

        // 在同步窗口内检查
        for offset in 0..=self.config.look_ahead_window {
            let check_counter = match counter.checked_add(offset) {
                Some(c) => c,
                None => break,
            };
            let expected_code =
                hotp(&secret.raw, check_counter, self.config.digits, self.config.algorithm)?;

            if constant_time_compare(normalized_code.as_bytes(), expected_code.as_bytes()) {
                return Ok(HotpVerifyResult {
                    valid: true,
                    matched_counter: Some(check_counter),
                    next_counter: check_counter.saturating_add(1),
                });
            }
        }

        Ok(HotpVerifyResult {
            valid: false,
            matched_counter: None,
            next_counter: counter,
        })
    }

    /// 获取配置
    pub fn config(&self) -> &HotpConfig {
        &self.config
    }
}

/// RFC 4226 核心计算：HMAC、动态截断、取模格式化
///
/// TOTP 的计数器派生完成后也复用这一计算。
pub(crate) fn hotp(key: &[u8], counter: u64, digits: u32, algorithm: Algorithm) -> Result<String> {
    if key.is_empty() {
        return Err(KeyError::EmptyKey.into());
    }

    let counter_bytes = counter.to_be_bytes();

    let hash = match algorithm {
        Algorithm::SHA1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key)
                .map_err(|e| Error::Key(KeyError::InvalidKey(e.to_string())))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::SHA256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|e| Error::Key(KeyError::InvalidKey(e.to_string())))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::SHA512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key)
                .map_err(|e| Error::Key(KeyError::InvalidKey(e.to_string())))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
    };

    // 动态截断：最后一个字节的低 4 位作为偏移，取 4 字节并屏蔽符号位
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let binary = ((hash[offset] & 0x7f) as u32) << 24
        | (hash[offset + 1] as u32) << 16
        | (hash[offset + 2] as u32) << 8
        | (hash[offset + 3] as u32);

    // 取模得到指定位数的码
    let modulo = 10u32.pow(digits);
    let code = binary % modulo;

    // 左填充零
    Ok(format!("{:0width$}", code, width = digits as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc4226_secret() -> OtpSecret {
        OtpSecret::from_bytes(b"12345678901234567890".to_vec())
    }

    #[test]
    fn test_hotp_config_default() {
        let config = HotpConfig::default();
        assert_eq!(config.digits, 6);
        assert_eq!(config.algorithm, Algorithm::SHA1);
        assert_eq!(config.look_ahead_window, 10);
        assert_eq!(config.secret_length, 20);
    }

    #[test]
    fn test_hotp_config_builder() {
        let config = HotpConfig::new()
            .with_digits(8)
            .with_algorithm(Algorithm::SHA256)
            .with_look_ahead_window(20);

        assert_eq!(config.digits, 8);
        assert_eq!(config.algorithm, Algorithm::SHA256);
        assert_eq!(config.look_ahead_window, 20);
    }

    #[test]
    fn test_invalid_digits_rejected() {
        for digits in [0, 5, 9] {
            let config = HotpConfig::new().with_digits(digits);
            let err = HotpGenerator::new(config).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Config(ConfigError::InvalidDigits(d)) if d == digits
                ),
                "digits {} should be rejected",
                digits
            );
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let generator = HotpGenerator::default_generator();
        let err = generator.generate_raw(b"", 0).unwrap_err();
        assert!(matches!(err, Error::Key(KeyError::EmptyKey)));
    }

    #[test]
    fn test_generate_secret() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        assert_eq!(secret.raw.len(), 20);
        assert!(!secret.base32.is_empty());
    }

    #[test]
    fn test_generate_deterministic() {
        let generator = HotpGenerator::default_generator();
        let secret = rfc4226_secret();

        let first = generator.generate(&secret, 42).unwrap();
        let second = generator.generate(&secret, 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_code() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        let code0 = generator.generate(&secret, 0).unwrap();
        let code1 = generator.generate(&secret, 1).unwrap();

        assert_eq!(code0.len(), 6);
        assert_eq!(code1.len(), 6);
        // 不同计数器应该生成不同的码
        assert_ne!(code0, code1);
    }

    #[test]
    fn test_code_within_range() {
        let secret = rfc4226_secret();

        for digits in 6..=8u32 {
            let generator = HotpGenerator::new(HotpConfig::new().with_digits(digits)).unwrap();
            for counter in 0..20 {
                let code = generator.generate(&secret, counter).unwrap();
                assert_eq!(code.len(), digits as usize);
                let value: u64 = code.parse().unwrap();
                assert!(value < 10u64.pow(digits));
            }
        }
    }

    #[test]
    fn test_verify_code() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        let code = generator.generate(&secret, 5).unwrap();

        // 从计数器 5 开始验证应该成功
        let (is_valid, next_counter) = generator.verify(&secret, &code, 5).unwrap();
        assert!(is_valid);
        assert_eq!(next_counter, 6);

        // 从计数器 0 开始验证也应该成功（在窗口内）
        let (is_valid, next_counter) = generator.verify(&secret, &code, 0).unwrap();
        assert!(is_valid);
        assert_eq!(next_counter, 6);
    }

    #[test]
    fn test_verify_code_outside_window() {
        let config = HotpConfig::default().with_look_ahead_window(5);
        let generator = HotpGenerator::new(config).unwrap();
        let secret = generator.generate_secret().unwrap();

        let code = generator.generate(&secret, 100).unwrap();

        // 从计数器 0 开始验证应该失败（超出窗口）
        let (is_valid, next_counter) = generator.verify(&secret, &code, 0).unwrap();
        assert!(!is_valid);
        assert_eq!(next_counter, 0); // 计数器不变
    }

    #[test]
    fn test_verify_wrong_length() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        let result = generator.verify_with_result(&secret, "12345", 0).unwrap();
        assert!(!result.valid);
    }

    #[test]
    fn test_verify_with_spaces() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        let code = generator.generate(&secret, 0).unwrap();
        let spaced_code = format!("{} {}", &code[..3], &code[3..]);

        let (is_valid, _) = generator.verify(&secret, &spaced_code, 0).unwrap();
        assert!(is_valid);
    }

    #[test]
    fn test_counter_increment() {
        let generator = HotpGenerator::default_generator();
        let secret = generator.generate_secret().unwrap();

        let mut counter = 0u64;

        for _ in 0..5 {
            let code = generator.generate(&secret, counter).unwrap();
            let (is_valid, new_counter) = generator.verify(&secret, &code, counter).unwrap();
            assert!(is_valid);
            counter = new_counter;
        }

        assert_eq!(counter, 5);
    }

    #[test]
    fn test_verify_near_counter_max() {
        let generator = HotpGenerator::default_generator();
        let secret = rfc4226_secret();

        // 窗口超出 u64::MAX 时不应回绕
        let code = generator.generate(&secret, u64::MAX).unwrap();
        let result = generator
            .verify_with_result(&secret, &code, u64::MAX)
            .unwrap();
        assert!(result.valid);
        assert_eq!(result.matched_counter, Some(u64::MAX));
    }

    // RFC 4226 附录 D 测试向量
    #[test]
    fn test_rfc4226_test_vectors() {
        let secret = rfc4226_secret();
        let generator = HotpGenerator::default_generator();

        let expected_codes = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];

        for (counter, expected) in expected_codes.iter().enumerate() {
            let code = generator.generate(&secret, counter as u64).unwrap();
            assert_eq!(&code, expected, "Failed at counter {}", counter);
        }
    }

    #[test]
    fn test_hotp_8_digits() {
        let config = HotpConfig::default().with_digits(8);
        let generator = HotpGenerator::new(config).unwrap();
        let secret = generator.generate_secret().unwrap();

        let code = generator.generate(&secret, 0).unwrap();
        assert_eq!(code.len(), 8);

        let (is_valid, _) = generator.verify(&secret, &code, 0).unwrap();
        assert!(is_valid);
    }

    #[test]
    fn test_hotp_with_different_algorithms() {
        for algorithm in [Algorithm::SHA1, Algorithm::SHA256, Algorithm::SHA512] {
            let config = HotpConfig::default().with_algorithm(algorithm);
            let generator = HotpGenerator::new(config).unwrap();
            let secret = generator.generate_secret().unwrap();

            let code = generator.generate(&secret, 0).unwrap();
            let (is_valid, _) = generator.verify(&secret, &code, 0).unwrap();
            assert!(is_valid, "Failed for algorithm {:?}", algorithm);
        }
    }

    #[test]
    fn test_algorithm_as_str() {
        assert_eq!(Algorithm::SHA1.as_str(), "SHA1");
        assert_eq!(Algorithm::SHA256.as_str(), "SHA256");
        assert_eq!(Algorithm::SHA512.as_str(), "SHA512");
    }
}
